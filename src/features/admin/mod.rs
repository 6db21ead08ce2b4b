//! Admin feature: user management.

pub mod client;
pub mod types;
