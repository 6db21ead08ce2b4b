//! Application shell: one session store, one API client and one navigator,
//! wired together and driven by [`App::navigate`].

use crate::{
    api::ApiClient,
    config::AppConfig,
    errors::AppError,
    features::auth::{
        evaluate,
        state::SessionStore,
        storage::{DurableStorage, FileStorage},
        Decision,
    },
    navigation::Navigator,
    routes::resolve,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Redirect chains are at most two hops long (for example `/profile` to
/// `/admin/settings`); anything past this is a routing loop.
const MAX_REDIRECTS: usize = 8;

/// What the client shows for a location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// The session has not been restored yet.
    Loading,
    Render {
        path: String,
        route: &'static str,
        params: Vec<(&'static str, String)>,
    },
}

#[derive(Clone, Debug)]
pub struct App {
    config: AppConfig,
    session: SessionStore,
    api: ApiClient,
    navigator: Navigator,
}

impl App {
    /// Opens file-backed storage in the configured directory and restores the
    /// session before returning.
    ///
    /// # Errors
    /// Returns an error if the storage directory or HTTP client cannot be set up.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        let storage = FileStorage::open(config.storage_dir.clone())?;
        Self::with_storage(config, Arc::new(storage))
    }

    /// Same as [`App::start`] over caller-provided storage.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(
        config: AppConfig,
        storage: Arc<dyn DurableStorage>,
    ) -> Result<Self, AppError> {
        let session = SessionStore::new(storage);
        session.initialize();
        let navigator = Navigator::default();
        let api = ApiClient::new(&config, session.clone(), navigator.clone())?;

        info!(
            api = %config.api_base_url,
            authenticated = session.is_authenticated(),
            "client started"
        );

        Ok(Self {
            config,
            session,
            api,
            navigator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Navigates to `location`, following guard redirects until a screen
    /// renders. The final location is recorded on the navigator.
    ///
    /// # Errors
    /// Returns `AppError::Config` if redirects do not settle.
    pub fn navigate(&self, location: &str) -> Result<Screen, AppError> {
        let mut target = location.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let resolved = resolve(&target);
            match evaluate(&self.session.snapshot(), resolved.route.access) {
                Decision::Loading => return Ok(Screen::Loading),
                Decision::Render => {
                    self.navigator.push(&resolved.path);
                    return Ok(Screen::Render {
                        path: resolved.path,
                        route: resolved.route.name,
                        params: resolved.params,
                    });
                }
                Decision::Redirect(next) => {
                    debug!(from = %resolved.path, to = next, "guard redirect");
                    target = next.to_string();
                }
            }
        }

        Err(AppError::Config(format!(
            "Too many redirects while navigating to {location}"
        )))
    }

    /// Re-evaluates wherever the navigator currently points, such as after an
    /// expired session pushed `/login`.
    ///
    /// # Errors
    /// Same as [`App::navigate`].
    pub fn refresh(&self) -> Result<Screen, AppError> {
        self.navigate(&self.navigator.current())
    }
}
