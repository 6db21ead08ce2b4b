use crate::{
    cli::{actions::Action, commands::global},
    config::ConfigOverrides,
    features::{
        auth::types::{ProfileUpdate, Role},
        farmers::types::RequestStatus,
    },
    routes::{LoginInput, RegisterInput},
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;

fn overrides(matches: &ArgMatches) -> ConfigOverrides {
    ConfigOverrides {
        api_base_url: matches.get_one::<String>(global::ARG_API_BASE_URL).cloned(),
        storage_dir: matches.get_one::<String>(global::ARG_STORAGE_DIR).cloned(),
        timeout_seconds: matches.get_one::<u64>(global::ARG_TIMEOUT).copied(),
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn request_id(matches: &ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>("id")
        .copied()
        .context("missing required argument: <id>")
}

fn profile_update(matches: &ArgMatches) -> ProfileUpdate {
    let text = |id: &str| matches.get_one::<String>(id).cloned();
    let number = |id: &str| matches.get_one::<f64>(id).copied();
    ProfileUpdate {
        first_name: text("first-name"),
        last_name: text("last-name"),
        phone: text("phone"),
        password: text("password"),
        service_radius: number("service-radius"),
        latitude: number("latitude"),
        longitude: number("longitude"),
        hourly_rate: number("hourly-rate"),
        service_details: text("service-details"),
    }
}

/// # Errors
/// Returns an error if required arguments are missing or no subcommand was given.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let config = overrides(matches);

    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no subcommand given"))?;

    let action = match name {
        "login" => Action::Login {
            config,
            input: LoginInput {
                email: required(sub, "email")?,
                password: required(sub, "password")?,
            },
        },
        "register" => Action::Register {
            config,
            input: RegisterInput {
                email: required(sub, "email")?,
                password: required(sub, "password")?,
                confirm_password: required(sub, "confirm-password")?,
                first_name: required(sub, "first-name")?,
                last_name: required(sub, "last-name")?,
                phone: sub.get_one::<String>("phone").cloned(),
                role: sub.get_one::<Role>("role").copied().unwrap_or(Role::Farmer),
            },
        },
        "logout" => Action::Logout { config },
        "whoami" => Action::Whoami { config },
        "profile" => Action::Profile {
            config,
            update: profile_update(sub),
        },
        "open" => Action::Open {
            config,
            path: required(sub, "path")?,
        },
        "fields" => Action::Fields { config },
        "requests" => Action::Requests { config },
        "available" => Action::Available { config },
        "accept" => Action::Accept {
            config,
            request_id: request_id(sub)?,
        },
        "complete" => Action::Complete {
            config,
            request_id: request_id(sub)?,
        },
        "users" => Action::Users {
            config,
            role: sub.get_one::<Role>("role").copied(),
        },
        "service-requests" => Action::ServiceRequests {
            config,
            status: sub.get_one::<RequestStatus>("status").copied(),
        },
        "stats" => Action::Stats { config },
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}
