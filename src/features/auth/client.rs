//! Client wrappers for the marketplace auth endpoints. Login and registration
//! are unauthenticated; profile calls carry the bearer token. None of these
//! functions touch the session store: committing credentials is the caller's job.

use crate::{
    api::{ApiClient, Auth},
    errors::AppError,
    features::auth::types::{
        AuthResponse, Identity, LoginRequest, ProfileResponse, ProfileUpdate, RegisterRequest,
    },
};

/// Exchanges credentials for an identity and token. Must never log the request.
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    api.post_json("/auth/login", request, Auth::Anonymous).await
}

/// Creates an account and returns its identity and token.
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    api.post_json("/auth/register", request, Auth::Anonymous)
        .await
}

/// Fetches the current user's profile.
pub async fn fetch_profile(api: &ApiClient) -> Result<Identity, AppError> {
    let response: ProfileResponse = api.get_json("/auth/profile", Auth::Bearer).await?;
    Ok(response.user)
}

/// Sends a partial profile update and returns the updated identity.
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> Result<Identity, AppError> {
    let response: ProfileResponse = api.put_json("/auth/profile", update, Auth::Bearer).await?;
    Ok(response.user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::tests::{can_bind_localhost, client_for};
    use crate::features::auth::{storage::MemoryStorage, types::Role};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json(role: &str) -> serde_json::Value {
        json!({
            "id": 1,
            "email": "farmer@example.com",
            "first_name": "Chidi",
            "last_name": "Nwosu",
            "phone": "555-0100",
            "role": role,
            "is_premium": false,
            "latitude": null,
            "longitude": null,
            "is_available": null,
            "service_radius": null,
            "hourly_rate": null,
            "service_details": null,
            "created_at": "2025-03-01T10:00:00"
        })
    }

    #[tokio::test]
    async fn login_posts_credentials_and_parses_response() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "farmer@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login successful",
                "user": user_json("farmer"),
                "access_token": "jwt-1"
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let response = login(
            &api,
            &LoginRequest {
                email: "farmer@example.com".to_string(),
                password: "pw".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.access_token, "jwt-1");
        assert_eq!(response.user.role.known(), Some(Role::Farmer));
        // The client wrapper does not commit the session by itself.
        assert!(!api.session().is_authenticated());
    }

    #[tokio::test]
    async fn register_surfaces_conflict_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "error": "Email already registered" })),
            )
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let err = register(
            &api,
            &RegisterRequest {
                email: "farmer@example.com".to_string(),
                password: "pw".to_string(),
                first_name: "Chidi".to_string(),
                last_name: "Nwosu".to_string(),
                phone: None,
                role: Role::Farmer,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.inline_message(), "Email already registered");
    }

    #[tokio::test]
    async fn update_profile_sends_bearer_and_returns_user() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/auth/profile"))
            .and(header("Authorization", "Bearer jwt-2"))
            .and(body_json(json!({ "phone": "555-0100" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Profile updated successfully",
                "user": user_json("farmer")
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        api.session()
            .login(crate::api::tests::identity(1, Role::Farmer), "jwt-2")
            .unwrap();

        let identity = update_profile(
            &api,
            &ProfileUpdate {
                phone: Some("555-0100".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(identity.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn fetch_profile_unwraps_user_envelope() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "user": user_json("admin") })),
            )
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let identity = fetch_profile(&api).await.unwrap();
        assert_eq!(identity.role.known(), Some(Role::Admin));
    }
}
