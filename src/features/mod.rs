//! Domain-level client features and their shared logic. Screens import these
//! modules so that session handling and API access stay in dedicated areas.

pub mod admin;
pub mod auth;
pub mod farmers;
pub mod operators;
