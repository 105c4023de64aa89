//! Wallet session lifecycle
//!
//! Who-is-connected is an explicit session object with a connect/disconnect
//! lifecycle, not ambient global state. The session persists as a JSON file
//! in the data directory; rehydrating it is a pure load step with no wallet
//! interaction, so a restarted process sees the same connection the user
//! left behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::WalletKind;

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The currently-connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: String,
    pub kind: WalletKind,
    pub connected_at: DateTime<Utc>,
}

impl WalletSession {
    pub fn new(address: String, kind: WalletKind) -> Self {
        Self {
            address,
            kind,
            connected_at: Utc::now(),
        }
    }
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rehydrate a persisted session. `None` when no wallet is connected.
    pub fn load(&self) -> Result<Option<WalletSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Record a new connection.
    pub fn save(&self, session: &WalletSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Disconnect: remove the persisted session if present.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn load_without_session_returns_none() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_load_clear_lifecycle() {
        let (_dir, store) = store();
        let session = WalletSession::new("0xAbC".to_string(), WalletKind::MetaMask);

        store.save(&session).unwrap();
        let loaded = store.load().unwrap().expect("session should exist");
        assert_eq!(loaded, session);

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn malformed_session_file_is_an_error_not_a_panic() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(SessionError::Malformed(_))));
    }
}
