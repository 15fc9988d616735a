use crate::api::client::ApiClient;
use crate::core::config::Config;
use crate::core::error::ApiError;
use crate::models::requests::{LoginRequest, ProfileUpdate};
use crate::models::user::UserRecord;
use crate::session::handle::{SessionHandle, SessionSnapshot};
use crate::stores::credentials::CredentialStore;
use crate::validation::registration::RegistrationForm;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// The session state machine: owns the credential store (through the shared
/// handle) and the API client, and is the sole entry point for every
/// session-mutating operation besides the client's internal 401 hook.
///
/// All fallible operations return errors as values; nothing here panics or
/// unwinds past this boundary.
pub struct SessionManager {
    handle: Arc<SessionHandle>,
    api: ApiClient,
}

impl SessionManager {
    pub fn new(config: &Config) -> Result<Self> {
        let store = CredentialStore::load(config.storage.credentials_path.clone())
            .context("Failed to open credential store")?;
        let handle = Arc::new(SessionHandle::new(store));
        let api = ApiClient::new(&config.api, Arc::clone(&handle))?;

        Ok(Self { handle, api })
    }

    pub fn handle(&self) -> &Arc<SessionHandle> {
        &self.handle
    }

    /// Direct access for non-session reads (student CRUD screens).
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.handle.snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.handle.is_admin()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.handle.current_user()
    }

    /// Rehydrate the session from the credential store. Called exactly once,
    /// at startup; afterwards the session never reads the store again.
    pub fn initialize(&self) {
        self.handle.initialize();

        let snapshot = self.snapshot();
        info!(
            authenticated = snapshot.is_authenticated(),
            user = snapshot.user.as_ref().map(|u| u.email.as_str()),
            "Session resolved"
        );
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, ApiError> {
        let auth = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.handle.set_authenticated(&auth.token, auth.user.clone());
        info!(user = %auth.user.email, role = %auth.user.role, "Logged in");

        Ok(auth.user)
    }

    /// Validate locally, then register. A form that fails validation produces
    /// no request at all.
    pub async fn register(&self, form: RegistrationForm) -> Result<UserRecord, ApiError> {
        let request = form.into_request()?;
        let auth = self.api.register(&request).await?;

        self.handle.set_authenticated(&auth.token, auth.user.clone());
        info!(user = %auth.user.email, role = %auth.user.role, "Registered");

        Ok(auth.user)
    }

    /// Best-effort backend logout, then unconditional local clear. The local
    /// session never survives a logout, reachable backend or not.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Backend logout failed, clearing local session anyway");
        }

        self.handle.clear();
        info!("Logged out");
    }

    /// Refetch the profile and apply it if the session has not changed since
    /// the request went out. Returns `Ok(None)` when the response arrived
    /// stale (a logout happened in flight) and was discarded.
    pub async fn refresh_profile(&self) -> Result<Option<UserRecord>, ApiError> {
        let epoch = self.handle.epoch();
        let user = self.api.get_profile().await?;

        Ok(self
            .handle
            .apply_if_current(epoch, user.clone())
            .then_some(user))
    }

    /// Same staleness contract as `refresh_profile`.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRecord>, ApiError> {
        let epoch = self.handle.epoch();
        let user = self.api.update_profile(update).await?;

        Ok(self
            .handle
            .apply_if_current(epoch, user.clone())
            .then_some(user))
    }
}
