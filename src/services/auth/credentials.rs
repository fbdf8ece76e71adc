//! Bearer token persistence.
//!
//! One JSON file under the data directory holds the token and its expiry.
//! The in-process copy sits in an `ArcSwapOption` so readers never block.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const CREDENTIAL_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn issue(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: now + Duration::days(CREDENTIAL_TTL_DAYS),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub struct CredentialStore {
    path: Option<PathBuf>,
    current: ArcSwapOption<Credential>,
}

impl CredentialStore {
    /// Process-local store. Nothing is written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: ArcSwapOption::empty(),
        }
    }

    /// File-backed store at `<dir>/credentials.json`, primed from disk.
    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(CREDENTIALS_FILE_NAME))
    }

    pub fn at(path: PathBuf) -> Self {
        let loaded = match read_credential(&path) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("Ignoring unreadable credential file {}: {}", path.display(), e);
                None
            }
        };
        Self {
            path: Some(path),
            current: ArcSwapOption::new(loaded.map(Arc::new)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self, token: &str) -> Result<Credential, AuthError> {
        let credential = Credential::issue(token, Utc::now());
        if let Some(path) = &self.path {
            let body = serde_json::to_vec_pretty(&credential)
                .map_err(|e| AuthError::storage(format!("Failed to encode credential: {e}")))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AuthError::storage(format!("Failed to create credential directory: {e}"))
                })?;
            }
            std::fs::write(path, body)
                .map_err(|e| AuthError::storage(format!("Failed to write credential: {e}")))?;
        }
        self.current.store(Some(Arc::new(credential.clone())));
        Ok(credential)
    }

    /// The stored credential if present and unexpired. Expired ones are
    /// deleted on the way out.
    pub fn load(&self) -> Option<Credential> {
        self.load_at(Utc::now())
    }

    pub(crate) fn load_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let current = self.current.load_full()?;
        if current.is_expired_at(now) {
            log::info!("Stored credential expired at {}", current.expires_at);
            if let Err(e) = self.clear() {
                log::warn!("{}", e);
            }
            return None;
        }
        Some(current.as_ref().clone())
    }

    pub fn token(&self) -> Option<String> {
        self.load().map(|c| c.token)
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        self.current.store(None);
        let Some(path) = &self.path else {
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::storage(format!(
                "Failed to remove credential: {e}"
            ))),
        }
    }
}

fn read_credential(path: &Path) -> Result<Option<Credential>, String> {
    let body = match std::fs::read(path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| e.to_string())
}
