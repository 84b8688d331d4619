//! Client-held session: the logged-in user id and its bearer token.
//!
//! A [`SessionManager`] is the only way the rest of the crate touches the
//! session. Where the session lives is decided by a [`SessionStore`].

use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// User id and bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "userId")]
    pub user_id: Id,
    pub token: String,
}

impl Session {
    #[must_use]
    pub fn new(user_id: Id, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Backing storage for the session.
pub trait SessionStore: Send + Sync {
    /// Reads the stored session, `None` when nothing has been stored yet.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Replaces whatever is stored with `session`.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;
}

/// Keeps the session in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<Session>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let slot = self.slot.read().map_err(|_| SessionError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self.slot.write().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(session.clone());
        Ok(())
    }
}

/// Persists the session as a small JSON file, `{"userId": .., "token": ..}`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let json = serde_json::to_string_pretty(session).map_err(|source| {
            SessionError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Shared handle to the session. Cloning is cheap and every clone sees the
/// same store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.current().map(|s| s.user_id))
            .finish()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SessionManager {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// The stored session, read fresh from the store.
    ///
    /// Storage errors are logged and read as "no session".
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "could not read session; continuing without one");
                None
            }
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Id> {
        self.current().map(|s| s.user_id)
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    /// Overwrites the stored session. Any earlier session is discarded
    /// without being looked at.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn replace(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        tracing::info!(user_id = %session.user_id, "session stored");
        Ok(())
    }
}
