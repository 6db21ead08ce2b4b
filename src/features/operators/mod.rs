//! Operator feature: the request marketplace and the operator's own availability.

pub mod client;
pub mod types;
