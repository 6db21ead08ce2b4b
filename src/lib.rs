//! # AgriDrone (Drone Services Marketplace Client)
//!
//! `agridrone` is the client side of a marketplace connecting farmers with drone
//! operators. It keeps the signed-in session, decides which screens a session may
//! see, and talks to the marketplace REST API for everything persistent.
//!
//! ## Session
//!
//! The session is an identity plus a bearer token, mirrored to durable storage
//! under the `user` and `token` keys so a restart resumes without a network
//! round trip. The store starts in a loading state and leaves it once storage
//! has been read.
//!
//! ## Access Guard
//!
//! Every route declares who may view it. The guard evaluates a session snapshot
//! against that declaration and answers render, loading or redirect:
//!
//! - anonymous sessions on protected routes go to `/login`;
//! - authenticated sessions with the wrong role go to their own dashboard;
//! - unrecognized roles go to `/login`.
//!
//! The guard is a convenience for the UI only. The API enforces authorization
//! and a `401` from any authenticated call signs the session out.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod features;
pub mod navigation;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
