//! Where the session credentials live between runs.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;
use tracing::debug;

use crate::models::Role;

/// The persisted credentials. Keys mirror the dashboard's local storage:
/// `token`, `role`, `userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCredentials {
    pub token: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "upId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value persistence for the session.
pub trait SessionStorage: Send + Sync {
    /// The stored credentials, or `None` when nobody is signed in.
    ///
    /// # Errors
    /// [`StorageError::Corrupt`] when the stored data cannot be read back.
    fn load(&self) -> Result<Option<PersistedCredentials>, StorageError>;

    /// Replace the stored credentials.
    ///
    /// # Errors
    /// Propagates write failures.
    fn save(&self, credentials: &PersistedCredentials) -> Result<(), StorageError>;

    /// Forget the stored credentials. Clearing empty storage is not an error.
    ///
    /// # Errors
    /// Propagates removal failures.
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON file, readable only by its owner.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedCredentials>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let serialized = serde_json::to_vec_pretty(credentials)?;
        write_private(&self.path, &serialized).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Write `contents` to a file that is created owner-only.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

/// Process-local storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<PersistedCredentials>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn with(credentials: PersistedCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedCredentials>, StorageError> {
        Ok(self
            .slot
            .lock()
            .map(|slot| slot.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone()))
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for &S {
    fn load(&self) -> Result<Option<PersistedCredentials>, StorageError> {
        (**self).load()
    }

    fn save(&self, credentials: &PersistedCredentials) -> Result<(), StorageError> {
        (**self).save(credentials)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}
