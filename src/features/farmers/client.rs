//! Client helpers for farmer endpoints (fields, service requests, operator search).

use crate::{
    api::{ApiClient, Auth},
    errors::AppError,
    features::{
        auth::types::Identity,
        farmers::types::{
            Ack, FarmerLocation, Field, FieldEnvelope, FieldInput, FieldsEnvelope,
            LocationEnvelope, NearbyOperator, OperatorEnvelope, OperatorsEnvelope, ServiceRequest,
            ServiceRequestEnvelope, ServiceRequestInput, ServiceRequestsEnvelope,
        },
    },
};

/// List the farmer's fields.
pub async fn list_fields(api: &ApiClient) -> Result<Vec<Field>, AppError> {
    let envelope: FieldsEnvelope = api.get_json("/farmers/fields", Auth::Bearer).await?;
    Ok(envelope.fields)
}

pub async fn get_field(api: &ApiClient, field_id: i64) -> Result<Field, AppError> {
    let envelope: FieldEnvelope = api
        .get_json(&format!("/farmers/fields/{field_id}"), Auth::Bearer)
        .await?;
    Ok(envelope.field)
}

pub async fn create_field(api: &ApiClient, input: &FieldInput) -> Result<Field, AppError> {
    let envelope: FieldEnvelope = api.post_json("/farmers/fields", input, Auth::Bearer).await?;
    Ok(envelope.field)
}

pub async fn update_field(
    api: &ApiClient,
    field_id: i64,
    input: &FieldInput,
) -> Result<Field, AppError> {
    let envelope: FieldEnvelope = api
        .put_json(&format!("/farmers/fields/{field_id}"), input, Auth::Bearer)
        .await?;
    Ok(envelope.field)
}

pub async fn delete_field(api: &ApiClient, field_id: i64) -> Result<Ack, AppError> {
    api.delete_json(&format!("/farmers/fields/{field_id}"), Auth::Bearer)
        .await
}

/// List the farmer's own service requests.
pub async fn list_service_requests(api: &ApiClient) -> Result<Vec<ServiceRequest>, AppError> {
    let envelope: ServiceRequestsEnvelope = api
        .get_json("/farmers/service-requests", Auth::Bearer)
        .await?;
    Ok(envelope.service_requests)
}

pub async fn get_service_request(
    api: &ApiClient,
    request_id: i64,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .get_json(&format!("/farmers/service-requests/{request_id}"), Auth::Bearer)
        .await?;
    Ok(envelope.service_request)
}

pub async fn create_service_request(
    api: &ApiClient,
    input: &ServiceRequestInput,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .post_json("/farmers/service-requests", input, Auth::Bearer)
        .await?;
    Ok(envelope.service_request)
}

pub async fn update_service_request(
    api: &ApiClient,
    request_id: i64,
    input: &ServiceRequestInput,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .put_json(
            &format!("/farmers/service-requests/{request_id}"),
            input,
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

/// Cancel a pending request.
pub async fn cancel_service_request(api: &ApiClient, request_id: i64) -> Result<Ack, AppError> {
    api.delete_json(&format!("/farmers/service-requests/{request_id}"), Auth::Bearer)
        .await
}

/// Search available operators around a point, nearest first. Radius in km.
pub async fn nearby_operators(
    api: &ApiClient,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
) -> Result<Vec<NearbyOperator>, AppError> {
    let mut query = vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
    ];
    if let Some(radius) = radius_km {
        query.push(("radius", radius.to_string()));
    }
    let envelope: OperatorsEnvelope = api
        .get_json_with_query("/farmers/nearby-operators", &query, Auth::Bearer)
        .await?;
    Ok(envelope.operators)
}

/// Public profile of one operator, for the booking screen.
pub async fn get_operator(api: &ApiClient, operator_id: i64) -> Result<Identity, AppError> {
    let envelope: OperatorEnvelope = api
        .get_json(&format!("/farmers/operators/{operator_id}"), Auth::Bearer)
        .await?;
    Ok(envelope.operator)
}

/// Stores the farmer's coordinates and writes the returned user through to
/// the live session.
///
/// # Errors
/// Returns an `AppError` if the request fails or the session cannot be persisted.
pub async fn update_location(
    api: &ApiClient,
    location: FarmerLocation,
) -> Result<Identity, AppError> {
    let envelope: LocationEnvelope = api
        .post_json("/farmers/update-location", &location, Auth::Bearer)
        .await?;
    api.session().update_identity(envelope.user.clone())?;
    Ok(envelope.user)
}
