use super::{commit_credentials, mount::MountGuard, with_fallback, SignedIn, Submission};
use crate::{
    api::ApiClient,
    errors::AppError,
    features::auth::{client, types::LoginRequest},
};
use std::{fmt, future::Future};
use tracing::debug;

const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

#[derive(Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login screen. Mounted while the value lives; dropping it unmounts.
#[derive(Debug)]
pub struct LoginForm {
    api: ApiClient,
    mount: MountGuard,
}

impl LoginForm {
    #[must_use]
    pub fn mount(api: ApiClient) -> Self {
        Self {
            api,
            mount: MountGuard::new(),
        }
    }

    /// Validates the input, authenticates against the API and commits the
    /// session. The returned future does not borrow the form, so it can outlive
    /// it; a response that arrives after unmount is discarded untouched.
    pub fn submit(
        &self,
        input: LoginInput,
    ) -> impl Future<Output = Result<Submission<SignedIn>, AppError>> + Send + 'static {
        let api = self.api.clone();
        let mounted = self.mount.token();

        async move {
            let email = input.email.trim().to_string();
            if email.is_empty() || input.password.trim().is_empty() {
                return Err(AppError::Validation(
                    "Email and password are required.".to_string(),
                ));
            }

            let request = LoginRequest {
                email,
                password: input.password,
            };
            let result = client::login(&api, &request).await;

            if !mounted.is_mounted() {
                debug!("login response arrived after unmount, discarding");
                return Ok(Submission::Discarded);
            }

            let response = result.map_err(|err| with_fallback(err, INVALID_CREDENTIALS))?;
            commit_credentials(&api, response).map(Submission::Completed)
        }
    }
}
