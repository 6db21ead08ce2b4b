use super::{enter, open_app, print_json};
use crate::{
    config::ConfigOverrides,
    features::{admin::client, auth::types::Role, farmers::types::RequestStatus},
    routes::paths,
};
use anyhow::Result;

/// # Errors
/// Returns an error if the session is not an admin's or the request fails.
pub async fn users(config: ConfigOverrides, role: Option<Role>) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::ADMIN_USERS)?;
    let users = client::list_users(app.api(), role).await?;
    print_json(&users)
}

/// # Errors
/// Returns an error if the session is not an admin's or the request fails.
pub async fn service_requests(config: ConfigOverrides, status: Option<RequestStatus>) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::ADMIN_SERVICE_REQUESTS)?;
    let requests = client::list_service_requests(app.api(), status).await?;
    print_json(&requests)
}

/// # Errors
/// Returns an error if the session is not an admin's or the request fails.
pub async fn stats(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::ADMIN_DASHBOARD)?;
    let totals = client::stats(app.api()).await?;
    print_json(&totals)
}
