//! Identity and auth payload types. Requests here carry passwords, so they must
//! never be logged; their `Debug` output redacts the secret fields.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Marketplace roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Operator,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Farmer, Role::Operator, Role::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Operator => "operator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "farmer" => Ok(Role::Farmer),
            "operator" => Ok(Role::Operator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Role string as received from the API or durable storage.
///
/// Anything outside the known set is kept verbatim so it round-trips unchanged
/// and the guard can treat it as its own case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Known(Role),
    Unrecognized(String),
}

impl RoleClaim {
    #[must_use]
    pub const fn known(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unrecognized(_) => None,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Known(role)
    }
}

impl fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleClaim::Known(role) => role.fmt(f),
            RoleClaim::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// The authenticated user's identity record (`user` in API responses).
/// Display data only; authorization decisions key off the token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: RoleClaim,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub service_radius: Option<f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub service_details: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

/// Response of the login and register endpoints.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub user: Identity,
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("access_token", &"***")
            .field("message", &self.message)
            .finish()
    }
}

/// Partial profile update; only the fields that are set are sent.
/// Operator-only fields are ignored by the server for other roles.
#[derive(Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_details: Option<String>,
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("service_radius", &self.service_radius)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("hourly_rate", &self.hourly_rate)
            .field("service_details", &self.service_details)
            .finish()
    }
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.password.is_none()
            && self.service_radius.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.hourly_rate.is_none()
            && self.service_details.is_none()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProfileResponse {
    pub user: Identity,
    #[serde(default)]
    pub message: Option<String>,
}
