//! Farmer feature: fields, service requests and the nearby-operator search.

pub mod client;
pub mod types;
