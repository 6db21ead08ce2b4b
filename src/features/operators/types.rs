use crate::features::farmers::types::{Field, ServiceRequest};
use serde::{Deserialize, Serialize};

/// A request together with the field it targets.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RequestDetail {
    pub service_request: ServiceRequest,
    #[serde(default)]
    pub field: Option<Field>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_radius: Option<f64>,
}

/// Availability window, passed through to the API as-is.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AvailabilityUpdate {
    pub dates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
