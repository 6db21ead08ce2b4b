use super::{enter, open_app, print_json};
use crate::{config::ConfigOverrides, features::operators::client, routes::paths};
use anyhow::Result;
use tracing::info;

/// # Errors
/// Returns an error if the session is not an operator's or the request fails.
pub async fn available(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::OPERATOR_AVAILABLE_REQUESTS)?;
    let requests = client::available_requests(app.api()).await?;
    print_json(&requests)
}

/// # Errors
/// Returns an error if the session is not an operator's or the API refuses.
pub async fn accept(config: ConfigOverrides, request_id: i64) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::OPERATOR_AVAILABLE_REQUESTS)?;
    let request = client::accept_request(app.api(), request_id).await?;
    info!(request_id, "service request accepted");
    print_json(&request)
}

/// # Errors
/// Returns an error if the session is not an operator's or the API refuses.
pub async fn complete(config: ConfigOverrides, request_id: i64) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::OPERATOR_ASSIGNED_REQUESTS)?;
    let request = client::complete_request(app.api(), request_id).await?;
    info!(request_id, "service request completed");
    print_json(&request)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::tests::{can_bind_localhost, identity};
    use crate::cli::actions::tests::overrides;
    use crate::errors::AppError;
    use crate::features::auth::types::Role;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn expired_token_signs_the_operator_out() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/operators/service-requests/7/complete"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let app = open_app(overrides(&server.uri(), dir.path())).unwrap();
        app.session()
            .login(identity(2, Role::Operator), "stale")
            .unwrap();

        let err = complete(overrides(&server.uri(), dir.path()), 7)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AppError>(),
            Some(&AppError::Unauthorized)
        );

        let reopened = open_app(overrides(&server.uri(), dir.path())).unwrap();
        assert!(!reopened.session().is_authenticated());
    }
}
