use super::{mount::MountGuard, with_fallback, Submission};
use crate::{
    api::ApiClient,
    errors::AppError,
    features::auth::{
        client,
        types::{Identity, ProfileUpdate},
    },
};
use std::future::Future;
use tracing::{debug, info};

const UPDATE_FAILED: &str = "Failed to update profile. Please try again.";

/// Profile editor shared by every role.
#[derive(Debug)]
pub struct ProfileForm {
    api: ApiClient,
    mount: MountGuard,
}

impl ProfileForm {
    #[must_use]
    pub fn mount(api: ApiClient) -> Self {
        Self {
            api,
            mount: MountGuard::new(),
        }
    }

    /// The identity the form starts from, if a session is live.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.api.session().identity()
    }

    /// Sends the update and, once the API accepts it, replaces the session's
    /// identity with the returned record. The token is left untouched.
    pub fn submit(
        &self,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<Submission<Identity>, AppError>> + Send + 'static {
        let api = self.api.clone();
        let mounted = self.mount.token();

        async move {
            if update.is_empty() {
                return Err(AppError::Validation("Nothing to update.".to_string()));
            }
            if update.password.as_deref().is_some_and(str::is_empty) {
                return Err(AppError::Validation(
                    "Password cannot be empty.".to_string(),
                ));
            }

            let result = client::update_profile(&api, &update).await;

            if !mounted.is_mounted() {
                debug!("profile response arrived after unmount, discarding");
                return Ok(Submission::Discarded);
            }

            let identity = result.map_err(|err| with_fallback(err, UPDATE_FAILED))?;
            api.session().update_identity(identity.clone())?;
            info!(user_id = identity.id, "profile updated");
            Ok(Submission::Completed(identity))
        }
    }
}
