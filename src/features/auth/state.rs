//! Session state for the client. The store is initialized once from durable
//! storage and then written through on every mutation, so a restart resumes the
//! same session without a network round trip. Token material stays inside a
//! `SecretString` and is never logged.

use crate::{
    errors::AppError,
    features::auth::{
        storage::{DurableStorage, TOKEN_KEY, USER_KEY},
        types::Identity,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info, warn};

/// An authenticated identity and its bearer token.
#[derive(Clone)]
pub struct Session {
    pub identity: Identity,
    token: SecretString,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("token", &"***")
            .finish()
    }
}

/// Point-in-time view of the store, as consumed by the access guard.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub session: Option<Session>,
}

impl SessionSnapshot {
    /// A non-empty token is the only thing that makes a session authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.token.expose_secret().is_empty())
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|session| &session.identity)
    }
}

struct State {
    loading: bool,
    session: Option<Session>,
}

/// Shared handle to the session. Clones observe and mutate the same state.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<State>>,
    storage: Arc<dyn DurableStorage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a store in the loading state. Call [`SessionStore::initialize`]
    /// before evaluating any guarded route.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                loading: true,
                session: None,
            })),
            storage,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restores the session from durable storage and leaves the loading state.
    /// Missing, empty or corrupt entries leave the session anonymous.
    pub fn initialize(&self) {
        let restored = self.read_stored_session();
        let mut state = self.state();
        if let Some(session) = &restored {
            debug!(user_id = session.identity.id, "session restored from storage");
        }
        state.session = restored;
        state.loading = false;
    }

    fn read_stored_session(&self) -> Option<Session> {
        let user = match self.storage.get_item(USER_KEY) {
            Ok(value) => value?,
            Err(err) => {
                warn!("Unable to read stored identity: {err}");
                return None;
            }
        };
        let token = match self.storage.get_item(TOKEN_KEY) {
            Ok(value) => value?,
            Err(err) => {
                warn!("Unable to read stored token: {err}");
                return None;
            }
        };
        if token.is_empty() {
            return None;
        }
        match serde_json::from_str::<Identity>(&user) {
            Ok(identity) => Some(Session {
                identity,
                token: SecretString::from(token),
            }),
            Err(err) => {
                warn!("Stored identity is corrupt, starting anonymous: {err}");
                None
            }
        }
    }

    /// Commits credentials returned by a successful login or registration.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for an empty token and
    /// `AppError::Storage`/`AppError::Serialization` if persisting fails.
    pub fn login(&self, identity: Identity, token: &str) -> Result<(), AppError> {
        if token.is_empty() {
            return Err(AppError::Validation(
                "Cannot start a session without a token.".to_string(),
            ));
        }
        let user = encode_identity(&identity)?;

        let mut state = self.state();
        // `user` first: an orphan identity without a token restores as anonymous.
        self.storage.set_item(USER_KEY, &user)?;
        self.storage.set_item(TOKEN_KEY, token)?;

        info!(user_id = identity.id, role = %identity.role, "session started");
        state.session = Some(Session {
            identity,
            token: SecretString::from(token.to_string()),
        });
        Ok(())
    }

    /// Clears both durable entries and then the live session. Safe to call when
    /// already logged out. If a removal fails the live session is kept, so
    /// memory never claims anonymous while a token survives on disk.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if an entry cannot be removed.
    pub fn logout(&self) -> Result<(), AppError> {
        let mut state = self.state();
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)?;
        let had_session = state.session.take().is_some();
        if had_session {
            info!("session cleared");
        }
        Ok(())
    }

    /// Replaces the identity after a profile edit, keeping the token as-is.
    /// Does nothing when no session is live.
    ///
    /// # Errors
    /// Returns `AppError::Storage`/`AppError::Serialization` if persisting fails.
    pub fn update_identity(&self, identity: Identity) -> Result<(), AppError> {
        let mut state = self.state();
        let Some(session) = state.session.as_mut() else {
            debug!("identity update ignored without a live session");
            return Ok(());
        };
        let user = encode_identity(&identity)?;
        self.storage.set_item(USER_KEY, &user)?;
        session.identity = identity;
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            loading: state.loading,
            session: state.session.clone(),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.identity.clone())
    }

    /// Reads the token from durable storage, as every outgoing API call does.
    /// Empty or unreadable entries count as no token.
    #[must_use]
    pub fn stored_token(&self) -> Option<SecretString> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(err) => {
                warn!("Unable to read stored token: {err}");
                None
            }
        }
    }
}

fn encode_identity(identity: &Identity) -> Result<String, AppError> {
    serde_json::to_string(identity)
        .map_err(|err| AppError::Serialization(format!("Failed to encode identity: {err}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::auth::{
        storage::{FileStorage, MemoryStorage},
        types::{Role, RoleClaim},
    };

    fn identity(id: i64, role: Role) -> Identity {
        Identity {
            id,
            email: format!("user{id}@example.com"),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            phone: None,
            role: RoleClaim::Known(role),
            is_premium: false,
            latitude: None,
            longitude: None,
            is_available: None,
            service_radius: None,
            hourly_rate: None,
            service_details: None,
            created_at: None,
        }
    }

    /// Reads and writes succeed; removals fail.
    struct StuckStorage(MemoryStorage);

    impl DurableStorage for StuckStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
            self.0.set_item(key, value)
        }

        fn remove_item(&self, _key: &str) -> Result<(), AppError> {
            Err(AppError::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn failed_logout_keeps_live_session_in_step_with_disk() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(StuckStorage(storage.clone())));
        store.initialize();
        store.login(identity(8, Role::Farmer), "kept").unwrap();

        assert!(matches!(store.logout(), Err(AppError::Storage(_))));
        assert!(store.is_authenticated());
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), Some("kept".to_string()));

        let reloaded = store_with(&storage);
        reloaded.initialize();
        assert_eq!(reloaded.is_authenticated(), store.is_authenticated());
    }

    fn store_with(storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(Arc::new(storage.clone()))
    }

    #[test]
    fn new_store_is_loading_until_initialized() {
        let store = store_with(&MemoryStorage::new());
        assert!(store.is_loading());
        assert!(!store.is_authenticated());

        store.initialize();
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn login_then_reload_restores_identity_and_token() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.initialize();
        store.login(identity(1, Role::Farmer), "abc").unwrap();

        let reloaded = store_with(&storage);
        reloaded.initialize();

        let snapshot = reloaded.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.identity(), Some(&identity(1, Role::Farmer)));
        assert_eq!(
            snapshot.session.unwrap().token().expose_secret(),
            "abc"
        );
    }

    #[test]
    fn logout_then_reload_stays_anonymous() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.initialize();
        store.login(identity(2, Role::Operator), "tok").unwrap();
        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);

        let reloaded = store_with(&storage);
        reloaded.initialize();
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn logout_is_idempotent() {
        let store = store_with(&MemoryStorage::new());
        store.initialize();
        store.logout().unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn login_rejects_empty_token() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.initialize();

        let result = store.login(identity(3, Role::Admin), "");
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(!store.is_authenticated());
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn update_identity_keeps_token_entry_byte_for_byte() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.initialize();
        store.login(identity(4, Role::Operator), "t0k3n-\u{e9}").unwrap();

        let before = storage.get_item(TOKEN_KEY).unwrap().unwrap();
        let mut updated = identity(4, Role::Operator);
        updated.phone = Some("555-0100".to_string());
        store.update_identity(updated.clone()).unwrap();
        let after = storage.get_item(TOKEN_KEY).unwrap().unwrap();

        assert_eq!(before.as_bytes(), after.as_bytes());
        assert_eq!(store.identity(), Some(updated.clone()));
        let stored: Identity =
            serde_json::from_str(&storage.get_item(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn update_identity_without_session_is_a_no_op() {
        let storage = MemoryStorage::new();
        let store = store_with(&storage);
        store.initialize();

        store.update_identity(identity(5, Role::Farmer)).unwrap();
        assert_eq!(store.identity(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn initialize_ignores_corrupt_identity() {
        let storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "{not json").unwrap();
        storage.set_item(TOKEN_KEY, "abc").unwrap();

        let store = store_with(&storage);
        store.initialize();
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn initialize_requires_both_entries() {
        let storage = MemoryStorage::new();
        storage
            .set_item(USER_KEY, &serde_json::to_string(&identity(6, Role::Farmer)).unwrap())
            .unwrap();

        let store = store_with(&storage);
        store.initialize();
        assert!(!store.is_authenticated());

        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "abc").unwrap();
        let store = store_with(&storage);
        store.initialize();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn initialize_treats_empty_token_as_anonymous() {
        let storage = MemoryStorage::new();
        storage
            .set_item(USER_KEY, &serde_json::to_string(&identity(8, Role::Farmer)).unwrap())
            .unwrap();
        storage.set_item(TOKEN_KEY, "").unwrap();

        let store = store_with(&storage);
        store.initialize();
        assert!(!store.is_authenticated());
        assert!(store.stored_token().is_none());
    }

    #[test]
    fn file_backed_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()));
        store.initialize();
        store.login(identity(9, Role::Admin), "file-token").unwrap();

        let restarted = SessionStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()));
        restarted.initialize();
        assert_eq!(restarted.identity(), Some(identity(9, Role::Admin)));
        assert_eq!(
            restarted.stored_token().unwrap().expose_secret(),
            "file-token"
        );
    }

    #[test]
    fn separate_stores_share_only_durable_storage() {
        let storage = MemoryStorage::new();
        let first = store_with(&storage);
        let second = store_with(&storage);
        first.initialize();
        second.initialize();

        first.login(identity(10, Role::Farmer), "first").unwrap();
        // The other instance keeps its in-memory view until it reinitializes.
        assert!(!second.is_authenticated());
        assert_eq!(
            second.stored_token().unwrap().expose_secret(),
            "first"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let store = store_with(&MemoryStorage::new());
        store.initialize();
        store.login(identity(11, Role::Farmer), "super-secret").unwrap();
        assert!(!format!("{store:?}").contains("super-secret"));
    }
}
