//! HTTP helpers for the marketplace JSON API with consistent timeouts and error
//! handling. Feature clients go through [`ApiClient`] so that bearer headers and
//! the forced-logout policy live in one place. The token is read from durable
//! storage per request and never logged.

use crate::{
    config::AppConfig, errors::AppError, features::auth::state::SessionStore,
    navigation::Navigator, routes::paths, APP_USER_AGENT,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;
/// Message used when the server gives no usable error body.
pub(crate) const GENERIC_FAILURE: &str = "Request failed.";

/// How a request authenticates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Login and registration. A 401 here is a credential error, not an
    /// expired session.
    Anonymous,
    /// Sends the stored bearer token; a 401 forces a logout.
    Bearer,
}

/// Shared API client bound to one session and navigator.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
    navigator: Navigator,
}

impl ApiClient {
    /// Builds a client using the configured base URL and timeout.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be created.
    pub fn new(
        config: &AppConfig,
        session: SessionStore,
        navigator: Navigator,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
            navigator,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Fetches JSON.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, AppError> {
        self.get_json_with_query(path, &[], auth).await
    }

    /// Fetches JSON with query parameters.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: Auth,
    ) -> Result<T, AppError> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(builder, auth).await?;
        self.handle_json_response(response, auth).await
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, AppError> {
        self.send_json(Method::POST, path, body, auth).await
    }

    /// Puts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, AppError> {
        self.send_json(Method::PUT, path, body, auth).await
    }

    /// Posts without a body, used for state transitions such as accepting a request.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, AppError> {
        let response = self.send(self.request(Method::POST, path), auth).await?;
        self.handle_json_response(response, auth).await
    }

    /// Puts without a body, used for admin transitions such as cancelling a request.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, AppError> {
        let response = self.send(self.request(Method::PUT, path), auth).await?;
        self.handle_json_response(response, auth).await
    }

    /// Sends a DELETE and parses the JSON acknowledgement.
    ///
    /// # Errors
    /// Returns an `AppError` for network, HTTP or decoding failures.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, AppError> {
        let response = self.send(self.request(Method::DELETE, path), auth).await?;
        self.handle_json_response(response, auth).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, AppError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let builder = self
            .request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        let response = self.send(builder, auth).await?;
        self.handle_json_response(response, auth).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, build_url(&self.base_url, path))
    }

    #[instrument(skip(self, builder), level = "debug")]
    async fn send(&self, builder: RequestBuilder, auth: Auth) -> Result<Response, AppError> {
        let builder = match (auth, self.session.stored_token()) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token.expose_secret()),
            _ => builder,
        };
        builder.send().await.map_err(map_request_error)
    }

    /// Parses JSON responses, maps HTTP errors, and applies the forced-logout
    /// policy to bearer-authenticated 401s.
    async fn handle_json_response<T: DeserializeOwned>(
        &self,
        response: Response,
        auth: Auth,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")));
        }

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            self.force_logout();
            return Err(AppError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request failed");
        Err(AppError::Http {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    fn force_logout(&self) {
        warn!("authorization rejected by the API, signing out");
        if let Err(err) = self.session.logout() {
            warn!("Failed to clear session after authorization failure: {err}");
        }
        self.navigator.push(paths::LOGIN);
    }
}

/// Joins the base URL and a path with exactly one slash between them.
fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Config(format!("Invalid request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Picks the server's own message (`error`, `message` or `msg`) when the body is
/// JSON, otherwise a trimmed and truncated copy of the body.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message", "msg"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.trim().is_empty() {
                    return sanitize_body(message);
                }
            }
        }
    }
    sanitize_body(body)
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::features::auth::{
        storage::{DurableStorage, MemoryStorage, TOKEN_KEY, USER_KEY},
        types::{Identity, Role, RoleClaim},
    };
    use serde_json::json;
    use std::{net::TcpListener, path::PathBuf, sync::Arc, time::Duration};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    pub(crate) fn identity(id: i64, role: Role) -> Identity {
        Identity {
            id,
            email: format!("user{id}@example.com"),
            first_name: "Amaka".to_string(),
            last_name: "Okafor".to_string(),
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

    pub(crate) fn client_for(uri: &str, storage: &MemoryStorage) -> ApiClient {
        let config = AppConfig {
            api_base_url: format!("{uri}/api"),
            storage_dir: PathBuf::from("/unused"),
            timeout: Duration::from_secs(5),
        };
        let session = SessionStore::new(Arc::new(storage.clone()));
        session.initialize();
        ApiClient::new(&config, session, Navigator::default()).unwrap()
    }

    #[test]
    fn build_url_joins_with_single_slash() {
        assert_eq!(
            build_url("http://host/api/", "/farmers/fields"),
            "http://host/api/farmers/fields"
        );
        assert_eq!(
            build_url("http://host/api", "auth/login"),
            "http://host/api/auth/login"
        );
        assert_eq!(build_url("  ", "/auth/login"), "/auth/login");
    }

    #[test]
    fn error_message_prefers_server_fields() {
        assert_eq!(
            error_message(r#"{"error": "Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(error_message(r#"{"msg": "Token has expired"}"#), "Token has expired");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
        assert_eq!(error_message(""), "Request failed.");
        assert_eq!(error_message(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[tokio::test]
    async fn bearer_requests_carry_the_stored_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let storage = MemoryStorage::new();
        let client = client_for(&server.uri(), &storage);
        client.session().login(identity(1, Role::Farmer), "abc").unwrap();

        let value: Value = client.get_json("/auth/profile", Auth::Bearer).await.unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn unauthorized_bearer_call_forces_logout_and_redirect() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/operators/service-requests"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "msg": "Token has expired" })),
            )
            .mount(&server)
            .await;

        let storage = MemoryStorage::new();
        let client = client_for(&server.uri(), &storage);
        client.session().login(identity(2, Role::Operator), "stale").unwrap();
        client.navigator().push(paths::OPERATOR_ASSIGNED_REQUESTS);

        let result: Result<Value, AppError> = client
            .get_json("/operators/service-requests", Auth::Bearer)
            .await;

        assert_eq!(result.unwrap_err(), AppError::Unauthorized);
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
        assert!(!client.session().is_authenticated());
        assert_eq!(client.navigator().current(), paths::LOGIN);
    }

    #[tokio::test]
    async fn unauthorized_anonymous_call_keeps_session() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let storage = MemoryStorage::new();
        let client = client_for(&server.uri(), &storage);
        client.session().login(identity(3, Role::Farmer), "keep").unwrap();

        let result: Result<Value, AppError> = client
            .post_json("/auth/login", &json!({ "email": "a", "password": "b" }), Auth::Anonymous)
            .await;

        assert_eq!(
            result.unwrap_err(),
            AppError::Http {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
        assert!(client.session().is_authenticated());
        assert_eq!(client.navigator().current(), paths::LANDING);
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_parse_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/farmers/fields"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), &MemoryStorage::new());
        let result: Result<Value, AppError> = client.get_json("/farmers/fields", Auth::Bearer).await;
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = AppConfig {
            api_base_url: format!("{}/api", server.uri()),
            storage_dir: PathBuf::from("/unused"),
            timeout: Duration::from_millis(200),
        };
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        session.initialize();
        let client = ApiClient::new(&config, session, Navigator::default()).unwrap();

        let result: Result<Value, AppError> = client.get_json("/slow", Auth::Anonymous).await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
