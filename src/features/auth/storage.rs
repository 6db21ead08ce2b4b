//! Durable key/value storage backing the session. Each backend persists a write
//! before returning, so a crash right after a successful call keeps the value.

use crate::errors::AppError;
use std::{
    collections::HashMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tempfile::NamedTempFile;
use tracing::trace;

/// Key holding the JSON-serialized identity record.
pub const USER_KEY: &str = "user";
/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";

/// Origin-scoped string storage, modeled on browser local storage.
pub trait DurableStorage: Send + Sync {
    /// Returns the stored value or `None` when the key is absent.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Stores a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the write cannot be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removes a key. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns `AppError::Storage` when the removal cannot be persisted.
    fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

/// Stores each key as a file inside one directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the storage directory.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            AppError::Storage(format!(
                "Failed to create storage directory {}: {err}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(self.dir.join(key))
        } else {
            Err(AppError::Storage(format!("Invalid storage key: {key:?}")))
        }
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Storage(format!("Failed to read {key}: {err}"))),
        }
    }

    /// Each call writes to its own uniquely named temp file before renaming it
    /// over the entry, so concurrent writers never fail; the last rename wins.
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        let write = || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|err| err.error)?;
            sync_dir(&self.dir)
        };
        write().map_err(|err| AppError::Storage(format!("Failed to write {key}: {err}")))?;
        trace!(key, "storage entry written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                sync_dir(&self.dir)
                    .map_err(|err| AppError::Storage(format!("Failed to remove {key}: {err}")))?;
                trace!(key, "storage entry removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Storage(format!("Failed to remove {key}: {err}"))),
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-memory storage. Clones share the same map, like two tabs of one origin.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.entries().remove(key);
        Ok(())
    }
}
