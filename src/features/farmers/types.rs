//! Types for farmer field and service-request endpoints.

use crate::features::auth::types::Identity;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    /// GeoJSON polygon, kept as the raw string the API stores.
    pub coordinates: String,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct FieldInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub coordinates: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl RequestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub field_id: i64,
    pub farmer_id: i64,
    #[serde(default)]
    pub operator_id: Option<i64>,
    pub service_type: String,
    pub status: RequestStatus,
    pub scheduled_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ServiceRequestInput {
    pub field_id: i64,
    pub service_type: String,
    /// `YYYY-MM-DD`.
    pub scheduled_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Operator summary returned by the nearby-operators search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearbyOperator {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub service_radius: Option<f64>,
    #[serde(default)]
    pub service_details: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct FieldsEnvelope {
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct FieldEnvelope {
    pub field: Field,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ServiceRequestsEnvelope {
    pub service_requests: Vec<ServiceRequest>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ServiceRequestEnvelope {
    pub service_request: ServiceRequest,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct OperatorEnvelope {
    pub operator: Identity,
}

/// Farmer location update. The API requires both coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FarmerLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct LocationEnvelope {
    pub user: Identity,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct OperatorsEnvelope {
    pub operators: Vec<NearbyOperator>,
}

/// Acknowledgement for mutations; `message` is shown to the user.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
