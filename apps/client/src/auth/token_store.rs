//! Persistence for the token pair and signed-in user between runs.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::user::User;

/// Persisted copy of the session, stored under the keys `accessToken`, `refreshToken` and `user`.
/// Files written before `user` was stored still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Key-value persistence for the session tokens. Writes are synchronous.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<PersistedSession, ApiError>;
    fn save(&self, tokens: &PersistedSession) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn load(&self) -> Result<PersistedSession, ApiError> {
        (**self).load()
    }

    fn save(&self, tokens: &PersistedSession) -> Result<(), ApiError> {
        (**self).save(tokens)
    }

    fn clear(&self) -> Result<(), ApiError> {
        (**self).clear()
    }
}

/// JSON file on disk. Each save replaces the file atomically through a sibling temp file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<PersistedSession, ApiError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedSession::default())
            }
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        serde_json::from_str(&raw).map_err(|e| {
            ApiError::Storage(format!("{} is not a valid token file: {e}", self.path.display()))
        })
    }

    fn save(&self, tokens: &PersistedSession) -> Result<(), ApiError> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir).map_err(|e| storage_error(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| storage_error(dir, e))?;
        write_json(&mut tmp, tokens).map_err(|e| storage_error(&self.path, e))?;
        tmp.flush().map_err(|e| storage_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| storage_error(&self.path, e.error))?;

        debug!("Saved session tokens to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}

fn write_json<W: Write>(writer: W, tokens: &PersistedSession) -> std::io::Result<()> {
    serde_json::to_writer_pretty(writer, tokens).map_err(std::io::Error::from)
}

fn storage_error(path: &Path, e: std::io::Error) -> ApiError {
    ApiError::Storage(format!("{}: {e}", path.display()))
}

/// In-process store; nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<PersistedSession>,
}

impl MemoryTokenStore {
    #[cfg(test)]
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        Self {
            tokens: Mutex::new(PersistedSession {
                access_token: Some(access_token.to_string()),
                refresh_token: Some(refresh_token.to_string()),
                user: None,
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<PersistedSession, ApiError> {
        Ok(self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, tokens: &PersistedSession) -> Result<(), ApiError> {
        *self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.save(&PersistedSession::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), PersistedSession::default());
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(&path);
        let tokens = PersistedSession {
            access_token: Some("acc".into()),
            refresh_token: Some("ref".into()),
            user: None,
        };

        store.save(&tokens).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"refreshToken\""));
        assert!(!raw.contains("\"user\""));
        assert_eq!(store.load().unwrap(), tokens);

        store.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileTokenStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[test]
    fn test_memory_store_clear_empties() {
        let store = MemoryTokenStore::with_tokens("a", "r");
        assert_eq!(store.load().unwrap().access_token.as_deref(), Some("a"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), PersistedSession::default());
    }

    #[test]
    fn test_file_store_keeps_user_and_reads_token_only_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"accessToken": "a", "refreshToken": "r"}"#).unwrap();
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap().user, None);

        let saved = PersistedSession {
            access_token: Some("a".into()),
            refresh_token: Some("r".into()),
            user: Some(User {
                id: 4,
                email: "ada@example.com".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            }),
        };
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), saved);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_a_storage_error() {
        let err = write_json(BrokenPipe, &PersistedSession::default()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);

        let err = storage_error(Path::new("session.json"), err);
        assert!(matches!(err, ApiError::Storage(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
