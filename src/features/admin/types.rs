use crate::features::{
    auth::types::{Identity, Role},
    farmers::types::RequestStatus,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UsersEnvelope {
    pub users: Vec<Identity>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: Identity,
}

/// Create or update payload for the admin user form. On update, a missing
/// password keeps the current one.
#[derive(Clone, Default, Serialize)]
pub struct UserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .field("is_premium", &self.is_premium)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AdminOperatorsEnvelope {
    pub operators: Vec<Identity>,
}

/// Partial update of a service request. Only the fields that are set are sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServiceRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct AssignOperator {
    pub operator_id: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub farmers: u64,
    pub operators: u64,
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCounts {
    pub pending: u64,
    pub accepted: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub total: u64,
}

/// Dashboard totals. `users.total` includes admins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub users: UserCounts,
    pub service_requests: RequestCounts,
    pub fields: u64,
}
