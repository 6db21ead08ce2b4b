use crate::cli::actions::{admin, browse, farmer, operator, session, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login { config, input } => session::login(config, input).await,
        Action::Register { config, input } => session::register(config, input).await,
        Action::Logout { config } => session::logout(config),
        Action::Whoami { config } => session::whoami(config),
        Action::Profile { config, update } => session::profile(config, update).await,
        Action::Open { config, path } => browse::open(config, &path),
        Action::Fields { config } => farmer::fields(config).await,
        Action::Requests { config } => farmer::requests(config).await,
        Action::Available { config } => operator::available(config).await,
        Action::Accept { config, request_id } => operator::accept(config, request_id).await,
        Action::Complete { config, request_id } => operator::complete(config, request_id).await,
        Action::Users { config, role } => admin::users(config, role).await,
        Action::ServiceRequests { config, status } => {
            admin::service_requests(config, status).await
        }
        Action::Stats { config } => admin::stats(config).await,
    }
}
