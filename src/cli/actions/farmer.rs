use super::{enter, open_app, print_json};
use crate::{config::ConfigOverrides, features::farmers::client, routes::paths};
use anyhow::Result;

/// # Errors
/// Returns an error if the session is not a farmer's or the request fails.
pub async fn fields(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::FARMER_FIELDS)?;
    let fields = client::list_fields(app.api()).await?;
    print_json(&fields)
}

/// # Errors
/// Returns an error if the session is not a farmer's or the request fails.
pub async fn requests(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    enter(&app, paths::FARMER_SERVICE_REQUESTS)?;
    let requests = client::list_service_requests(app.api()).await?;
    print_json(&requests)
}
