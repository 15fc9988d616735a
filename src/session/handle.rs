use crate::models::user::UserRecord;
use crate::stores::credentials::CredentialStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::warn;

/// Session lifecycle. `Initializing` exists only between process start and
/// the one rehydration pass; afterward the state is exactly one of
/// `Authenticated` or `Anonymous`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Initializing,
    Authenticated(UserRecord),
    Anonymous,
}

/// Point-in-time view of the session handed to readers (the access gate and
/// the console). Mirrors `{loading, user}` without exposing the writers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub user: Option<UserRecord>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().map(|u| u.is_admin()).unwrap_or(false)
    }
}

/// Shared session state plus the credential store it mirrors into.
///
/// The only writers are the session manager (initialize/login/register/logout)
/// and the API client's 401 hook (`expire`). Everything else reads snapshots.
/// The epoch counter bumps on every transition out of `Authenticated`, letting
/// in-flight responses detect that they became stale.
pub struct SessionHandle {
    state: RwLock<SessionState>,
    store: CredentialStore,
    epoch: AtomicU64,
    expiry_notified: AtomicBool,
}

impl SessionHandle {
    pub fn new(store: CredentialStore) -> Self {
        Self {
            state: RwLock::new(SessionState::Initializing),
            store,
            epoch: AtomicU64::new(0),
            expiry_notified: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        match &*state {
            SessionState::Initializing => SessionSnapshot {
                loading: true,
                user: None,
            },
            SessionState::Authenticated(user) => SessionSnapshot {
                loading: false,
                user: Some(user.clone()),
            },
            SessionState::Anonymous => SessionSnapshot {
                loading: false,
                user: None,
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.snapshot().user
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn store_is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// One-pass rehydration at startup. Both entries present resolves to
    /// `Authenticated`; anything else (including a half-written store) clears
    /// the store and resolves to `Anonymous`. No partial state survives.
    pub fn initialize(&self) {
        let resolved = match (self.store.token(), self.store.user()) {
            (Some(_), Some(user)) => SessionState::Authenticated(user),
            (None, None) => SessionState::Anonymous,
            _ => {
                warn!("Credential store held a partial session, discarding");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear partial credential store");
                }
                SessionState::Anonymous
            }
        };

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = resolved;
    }

    /// Record a fresh login/register: write through the store, enter
    /// `Authenticated`, re-arm the expiry notice.
    pub fn set_authenticated(&self, token: &str, user: UserRecord) {
        if let Err(e) = self.store.store_session(token, &user) {
            // The in-memory session stays valid for this process either way
            warn!(error = %e, "Failed to persist credentials, session will not survive restart");
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SessionState::Authenticated(user);
        self.expiry_notified.store(false, Ordering::SeqCst);
    }

    /// Unconditional local logout: clear the store, enter `Anonymous`, bump
    /// the epoch so in-flight responses are discarded.
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credential store");
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SessionState::Anonymous;
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Forced logout on a 401. Same local effect as `clear`, but reports
    /// whether this call was the first to notice since the last login so the
    /// expiry notice fires exactly once even with several in-flight failures.
    pub fn expire(&self) -> bool {
        self.clear();
        !self.expiry_notified.swap(true, Ordering::SeqCst)
    }

    /// Apply a refetched user record only if the session epoch is unchanged
    /// since the request was issued. Returns false when the response is stale
    /// (a logout happened in between) or the session is no longer
    /// authenticated; stale responses must never resurrect a session.
    pub fn apply_if_current(&self, epoch: u64, user: UserRecord) -> bool {
        if self.epoch() != epoch {
            return false;
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        match &*state {
            SessionState::Authenticated(_) => {
                if let Some(token) = self.store.token() {
                    if let Err(e) = self.store.store_session(&token, &user) {
                        warn!(error = %e, "Failed to refresh cached user record");
                    }
                }
                *state = SessionState::Authenticated(user);
                true
            }
            _ => false,
        }
    }
}
