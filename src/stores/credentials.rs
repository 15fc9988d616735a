use crate::models::user::UserRecord;
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::path::PathBuf;
use tracing::warn;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Persisted credential store: a small key-value map holding the bearer token
/// and the last-fetched user record, mirrored to a JSON file across restarts.
///
/// The session is rehydrated from this store exactly once per process start;
/// afterward the in-memory session is the source of truth and every session
/// mutation writes through here.
pub struct CredentialStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl CredentialStore {
    /// Open the store, reading persisted entries if the file exists.
    /// A missing file is a fresh (empty) store, not an error.
    pub fn load(path: PathBuf) -> Result<Self> {
        let entries = DashMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .context(format!("Failed to read credential store: {}", path.display()))?;

            match serde_json::from_str::<std::collections::HashMap<String, String>>(&content) {
                Ok(map) => {
                    for (key, value) in map {
                        entries.insert(key, value);
                    }
                }
                Err(e) => {
                    // A corrupt store is treated as empty rather than fatal
                    warn!(error = %e, path = %path.display(), "Credential store unreadable, discarding");
                }
            }
        }

        Ok(Self { path, entries })
    }

    pub fn token(&self) -> Option<String> {
        self.entries.get(TOKEN_KEY).map(|e| e.value().clone())
    }

    /// Cached user record, if present and still decodable.
    pub fn user(&self) -> Option<UserRecord> {
        let raw = self.entries.get(USER_KEY).map(|e| e.value().clone())?;

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Cached user record unreadable, treating as absent");
                None
            }
        }
    }

    /// Write both entries and persist. Called on successful login/register.
    pub fn store_session(&self, token: &str, user: &UserRecord) -> Result<()> {
        let user_json = serde_json::to_string(user)
            .context("Failed to serialize user record")?;

        self.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.entries.insert(USER_KEY.to_string(), user_json);

        self.persist()
    }

    /// Remove both entries and the backing file. Idempotent: clearing an
    /// already-empty store is a no-op.
    pub fn clear(&self) -> Result<()> {
        if self.entries.is_empty() && !self.path.exists() {
            return Ok(());
        }

        self.entries.clear();

        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .context(format!("Failed to remove credential store: {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the current entries atomically (write temp file, then rename).
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context(format!("Failed to create storage directory: {}", parent.display()))?;
            }
        }

        let map: std::collections::HashMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        let content = serde_json::to_string_pretty(&map)
            .context("Failed to serialize credential store")?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, content)
            .context(format!("Failed to write credential store: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .context("Failed to replace credential store file")?;

        Ok(())
    }
}
