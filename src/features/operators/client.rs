//! Client helpers for operator endpoints.

use crate::{
    api::{ApiClient, Auth},
    errors::AppError,
    features::{
        farmers::types::{Ack, ServiceRequest, ServiceRequestEnvelope, ServiceRequestsEnvelope},
        operators::types::{AvailabilityUpdate, LocationUpdate, RequestDetail},
    },
};

/// Pending requests nobody has accepted yet.
pub async fn available_requests(api: &ApiClient) -> Result<Vec<ServiceRequest>, AppError> {
    let envelope: ServiceRequestsEnvelope = api
        .get_json("/operators/service-requests/available", Auth::Bearer)
        .await?;
    Ok(envelope.service_requests)
}

/// Requests assigned to the signed-in operator.
pub async fn assigned_requests(api: &ApiClient) -> Result<Vec<ServiceRequest>, AppError> {
    let envelope: ServiceRequestsEnvelope = api
        .get_json("/operators/service-requests", Auth::Bearer)
        .await?;
    Ok(envelope.service_requests)
}

pub async fn request_detail(api: &ApiClient, request_id: i64) -> Result<RequestDetail, AppError> {
    api.get_json(
        &format!("/operators/service-requests/{request_id}"),
        Auth::Bearer,
    )
    .await
}

pub async fn accept_request(api: &ApiClient, request_id: i64) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .post_empty(
            &format!("/operators/service-requests/{request_id}/accept"),
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

pub async fn complete_request(
    api: &ApiClient,
    request_id: i64,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .post_empty(
            &format!("/operators/service-requests/{request_id}/complete"),
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

pub async fn update_availability(
    api: &ApiClient,
    update: &AvailabilityUpdate,
) -> Result<Ack, AppError> {
    api.post_json("/operators/availability", update, Auth::Bearer)
        .await
}

/// Updates location, availability and radius. The API ignores a latitude sent
/// without its longitude, so the pair is rejected here instead.
pub async fn update_location(api: &ApiClient, update: &LocationUpdate) -> Result<Ack, AppError> {
    if update.latitude.is_some() != update.longitude.is_some() {
        return Err(AppError::Validation(
            "Latitude and longitude must be provided together.".to_string(),
        ));
    }
    api.post_json("/operators/update-location", update, Auth::Bearer)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::tests::{can_bind_localhost, client_for, identity};
    use crate::features::{
        auth::{storage::MemoryStorage, types::Role},
        farmers::types::RequestStatus,
    };
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_json(status: &str) -> serde_json::Value {
        json!({
            "id": 12,
            "field_id": 3,
            "farmer_id": 1,
            "operator_id": 5,
            "service_type": "fertilizer",
            "status": status,
            "scheduled_date": "2025-07-10",
            "notes": "East corner first"
        })
    }

    #[tokio::test]
    async fn accept_request_returns_updated_request() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/operators/service-requests/12/accept"))
            .and(header("Authorization", "Bearer op"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Service request accepted successfully",
                "service_request": request_json("accepted")
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        api.session().login(identity(5, Role::Operator), "op").unwrap();

        let request = accept_request(&api, 12).await.unwrap();
        assert_eq!(request.status, RequestStatus::Accepted);
        assert_eq!(request.operator_id, Some(5));
    }

    #[tokio::test]
    async fn request_detail_includes_field() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/operators/service-requests/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service_request": request_json("accepted"),
                "field": {
                    "id": 3,
                    "name": "River field",
                    "coordinates": "[]"
                }
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let detail = request_detail(&api, 12).await.unwrap();
        assert_eq!(detail.field.unwrap().name, "River field");
    }

    #[tokio::test]
    async fn update_location_requires_coordinate_pair() {
        let api = client_for("http://127.0.0.1:9", &MemoryStorage::new());
        let err = update_location(
            &api,
            &LocationUpdate {
                latitude: Some(6.5),
                ..LocationUpdate::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn assigned_requests_unwraps_envelope() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/operators/service-requests"))
            .and(header("Authorization", "Bearer op"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service_requests": [request_json("accepted"), request_json("completed")]
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        api.session().login(identity(5, Role::Operator), "op").unwrap();

        let requests = assigned_requests(&api).await.unwrap();
        let statuses: Vec<RequestStatus> = requests.iter().map(|request| request.status).collect();
        assert_eq!(
            statuses,
            vec![RequestStatus::Accepted, RequestStatus::Completed]
        );
    }

    #[tokio::test]
    async fn update_availability_posts_dates() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/operators/availability"))
            .and(body_json(json!({
                "dates": ["2025-07-10", "2025-07-11"],
                "notes": "Mornings only"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "message": "Availability updated successfully" })),
            )
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let ack = update_availability(
            &api,
            &AvailabilityUpdate {
                dates: vec!["2025-07-10".to_string(), "2025-07-11".to_string()],
                notes: Some("Mornings only".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            ack.message.as_deref(),
            Some("Availability updated successfully")
        );
    }

    #[tokio::test]
    async fn available_requests_unwraps_envelope() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/operators/service-requests/available"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "service_requests": [request_json("pending")]
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let requests = available_requests(&api).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn complete_request_returns_updated_request() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/operators/service-requests/12/complete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Service request marked as completed",
                "service_request": request_json("completed")
            })))
            .mount(&server)
            .await;

        let api = client_for(&server.uri(), &MemoryStorage::new());
        let request = complete_request(&api, 12).await.unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
    }
}
