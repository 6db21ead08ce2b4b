pub mod admin;
pub mod browse;
pub mod farmer;
pub mod operator;
pub mod session;

// Single dispatch point for `Action`, kept apart so this module stays small.
mod run;

use crate::{
    app::{App, Screen},
    config::{AppConfig, ConfigOverrides},
    features::{
        auth::types::{ProfileUpdate, Role},
        farmers::types::RequestStatus,
    },
    routes::{normalize_path, LoginInput, RegisterInput},
};
use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Login {
        config: ConfigOverrides,
        input: LoginInput,
    },
    Register {
        config: ConfigOverrides,
        input: RegisterInput,
    },
    Logout {
        config: ConfigOverrides,
    },
    Whoami {
        config: ConfigOverrides,
    },
    Profile {
        config: ConfigOverrides,
        update: ProfileUpdate,
    },
    Open {
        config: ConfigOverrides,
        path: String,
    },
    Fields {
        config: ConfigOverrides,
    },
    Requests {
        config: ConfigOverrides,
    },
    Available {
        config: ConfigOverrides,
    },
    Accept {
        config: ConfigOverrides,
        request_id: i64,
    },
    Complete {
        config: ConfigOverrides,
        request_id: i64,
    },
    Users {
        config: ConfigOverrides,
        role: Option<Role>,
    },
    ServiceRequests {
        config: ConfigOverrides,
        status: Option<RequestStatus>,
    },
    Stats {
        config: ConfigOverrides,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Loads configuration and restores the stored session.
fn open_app(config: ConfigOverrides) -> Result<App> {
    let config = AppConfig::load(config)?;
    Ok(App::start(config)?)
}

/// Enters a guarded screen, failing with the guard's redirect when the
/// session may not see it.
fn enter(app: &App, path: &str) -> Result<()> {
    let requested = normalize_path(path);
    match app.navigate(&requested)? {
        Screen::Render { path: rendered, .. } if rendered == requested => Ok(()),
        Screen::Render { path: rendered, .. } => {
            bail!("{requested} is not available to this session (redirected to {rendered})")
        }
        Screen::Loading => bail!("session is still loading"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
