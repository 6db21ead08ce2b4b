use super::{commit_credentials, mount::MountGuard, with_fallback, SignedIn, Submission};
use crate::{
    api::ApiClient,
    errors::AppError,
    features::auth::{
        client,
        types::{RegisterRequest, Role},
    },
};
use regex::Regex;
use std::{fmt, future::Future};
use tracing::debug;

const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[derive(Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl Default for RegisterInput {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            role: Role::Farmer,
        }
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

impl RegisterInput {
    fn validate(self) -> Result<RegisterRequest, AppError> {
        let email = self.email.trim().to_string();
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();

        if email.is_empty()
            || self.password.is_empty()
            || first_name.is_empty()
            || last_name.is_empty()
        {
            return Err(AppError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "Please enter a valid email address.".to_string(),
            ));
        }
        if self.role == Role::Admin {
            return Err(AppError::Validation(
                "Only farmer and operator accounts can be registered.".to_string(),
            ));
        }

        Ok(RegisterRequest {
            email,
            password: self.password,
            first_name,
            last_name,
            phone: self
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            role: self.role,
        })
    }
}

/// Registration screen. On success it signs the new account in exactly like
/// the login screen does.
#[derive(Debug)]
pub struct RegisterForm {
    api: ApiClient,
    mount: MountGuard,
}

impl RegisterForm {
    #[must_use]
    pub fn mount(api: ApiClient) -> Self {
        Self {
            api,
            mount: MountGuard::new(),
        }
    }

    pub fn submit(
        &self,
        input: RegisterInput,
    ) -> impl Future<Output = Result<Submission<SignedIn>, AppError>> + Send + 'static {
        let api = self.api.clone();
        let mounted = self.mount.token();

        async move {
            let request = input.validate()?;
            let result = client::register(&api, &request).await;

            if !mounted.is_mounted() {
                debug!("registration response arrived after unmount, discarding");
                return Ok(Submission::Discarded);
            }

            let response = result.map_err(|err| with_fallback(err, REGISTRATION_FAILED))?;
            commit_credentials(&api, response).map(Submission::Completed)
        }
    }
}
