//! Shared current-location cell. The app records each navigation here and the
//! API layer pushes the login route when a session is revoked.

use crate::routes::{normalize_path, paths};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct Navigator {
    location: Arc<Mutex<String>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(paths::LANDING)
    }
}

impl Navigator {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            location: Arc::new(Mutex::new(normalize_path(initial))),
        }
    }

    fn location(&self) -> MutexGuard<'_, String> {
        self.location.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.location().clone()
    }

    pub fn push(&self, path: &str) {
        let path = normalize_path(path);
        debug!(%path, "navigate");
        *self.location() = path;
    }
}
