//! Client helpers for the admin area: users, service requests, operators and
//! dashboard totals.

use crate::{
    api::{ApiClient, Auth},
    errors::AppError,
    features::{
        admin::types::{
            AdminOperatorsEnvelope, AssignOperator, ServiceRequestUpdate, Stats, UserEnvelope,
            UserInput, UsersEnvelope,
        },
        auth::types::{Identity, Role},
        farmers::types::{
            Ack, RequestStatus, ServiceRequest, ServiceRequestEnvelope, ServiceRequestsEnvelope,
        },
    },
};

/// List users, optionally filtered by role.
pub async fn list_users(api: &ApiClient, role: Option<Role>) -> Result<Vec<Identity>, AppError> {
    let query: Vec<(&str, String)> = role
        .map(|role| vec![("role", role.as_str().to_string())])
        .unwrap_or_default();
    let envelope: UsersEnvelope = api
        .get_json_with_query("/admin/users", &query, Auth::Bearer)
        .await?;
    Ok(envelope.users)
}

pub async fn get_user(api: &ApiClient, user_id: i64) -> Result<Identity, AppError> {
    let envelope: UserEnvelope = api
        .get_json(&format!("/admin/users/{user_id}"), Auth::Bearer)
        .await?;
    Ok(envelope.user)
}

pub async fn create_user(api: &ApiClient, input: &UserInput) -> Result<Identity, AppError> {
    let envelope: UserEnvelope = api.post_json("/admin/users", input, Auth::Bearer).await?;
    Ok(envelope.user)
}

pub async fn update_user(
    api: &ApiClient,
    user_id: i64,
    input: &UserInput,
) -> Result<Identity, AppError> {
    let envelope: UserEnvelope = api
        .put_json(&format!("/admin/users/{user_id}"), input, Auth::Bearer)
        .await?;
    Ok(envelope.user)
}

pub async fn delete_user(api: &ApiClient, user_id: i64) -> Result<Ack, AppError> {
    api.delete_json(&format!("/admin/users/{user_id}"), Auth::Bearer)
        .await
}

/// Every service request, optionally filtered by status.
pub async fn list_service_requests(
    api: &ApiClient,
    status: Option<RequestStatus>,
) -> Result<Vec<ServiceRequest>, AppError> {
    let query: Vec<(&str, String)> = status
        .map(|status| vec![("status", status.as_str().to_string())])
        .unwrap_or_default();
    let envelope: ServiceRequestsEnvelope = api
        .get_json_with_query("/admin/service-requests", &query, Auth::Bearer)
        .await?;
    Ok(envelope.service_requests)
}

pub async fn get_service_request(
    api: &ApiClient,
    request_id: i64,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .get_json(&format!("/admin/service-requests/{request_id}"), Auth::Bearer)
        .await?;
    Ok(envelope.service_request)
}

pub async fn update_service_request(
    api: &ApiClient,
    request_id: i64,
    update: &ServiceRequestUpdate,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .put_json(
            &format!("/admin/service-requests/{request_id}"),
            update,
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

pub async fn assign_operator(
    api: &ApiClient,
    request_id: i64,
    operator_id: i64,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .put_json(
            &format!("/admin/service-requests/{request_id}/assign"),
            &AssignOperator { operator_id },
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

pub async fn cancel_service_request(
    api: &ApiClient,
    request_id: i64,
) -> Result<ServiceRequest, AppError> {
    let envelope: ServiceRequestEnvelope = api
        .put_empty(
            &format!("/admin/service-requests/{request_id}/cancel"),
            Auth::Bearer,
        )
        .await?;
    Ok(envelope.service_request)
}

/// All operator accounts, for the assignment picker.
pub async fn list_operators(api: &ApiClient) -> Result<Vec<Identity>, AppError> {
    let envelope: AdminOperatorsEnvelope = api.get_json("/admin/operators", Auth::Bearer).await?;
    Ok(envelope.operators)
}

pub async fn stats(api: &ApiClient) -> Result<Stats, AppError> {
    api.get_json("/admin/stats", Auth::Bearer).await
}
