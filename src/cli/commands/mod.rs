pub mod global;

use crate::features::{auth::types::Role, farmers::types::RequestStatus};
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

fn validator_role() -> ValueParser {
    ValueParser::from(|role: &str| role.parse::<Role>())
}

fn validator_status() -> ValueParser {
    ValueParser::from(|status: &str| status.parse::<RequestStatus>())
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn credentials(command: Command) -> Command {
    command
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email")
                .env("AGRIDRONE_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("Account password")
                .env("AGRIDRONE_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

fn register() -> Command {
    credentials(Command::new("register").about("Create an account and sign in"))
        .arg(
            Arg::new("confirm-password")
                .long("confirm-password")
                .help("Repeat the password")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("first-name")
                .long("first-name")
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new("last-name")
                .long("last-name")
                .help("Last name")
                .required(true),
        )
        .arg(Arg::new("phone").long("phone").help("Phone number"))
        .arg(
            Arg::new("role")
                .long("role")
                .help("Account role: farmer or operator")
                .default_value("farmer")
                .value_parser(validator_role()),
        )
}

fn profile() -> Command {
    Command::new("profile")
        .about("Update the signed-in profile")
        .arg(Arg::new("first-name").long("first-name").help("First name"))
        .arg(Arg::new("last-name").long("last-name").help("Last name"))
        .arg(Arg::new("phone").long("phone").help("Phone number"))
        .arg(
            Arg::new("password")
                .long("password")
                .help("New password")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("service-radius")
                .long("service-radius")
                .help("Operator service radius in km")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("latitude")
                .long("latitude")
                .help("Operator base latitude")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("longitude")
                .long("longitude")
                .help("Operator base longitude")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("hourly-rate")
                .long("hourly-rate")
                .help("Operator hourly rate")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("service-details")
                .long("service-details")
                .help("Operator service description"),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("agridrone")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(credentials(
            Command::new("login").about("Sign in and store the session"),
        ))
        .subcommand(register())
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in identity"))
        .subcommand(profile())
        .subcommand(
            Command::new("open")
                .about("Show which screen a path resolves to for this session")
                .arg(Arg::new("path").help("Route path, e.g. /farmer/fields").required(true)),
        )
        .subcommand(Command::new("fields").about("List your fields (farmer)"))
        .subcommand(Command::new("requests").about("List your service requests (farmer)"))
        .subcommand(Command::new("available").about("List open service requests (operator)"))
        .subcommand(
            Command::new("accept")
                .about("Accept a service request (operator)")
                .arg(id_arg("Service request id")),
        )
        .subcommand(
            Command::new("complete")
                .about("Mark an accepted service request completed (operator)")
                .arg(id_arg("Service request id")),
        )
        .subcommand(
            Command::new("users")
                .about("List users (admin)")
                .arg(
                    Arg::new("role")
                        .long("role")
                        .help("Only show users with this role")
                        .action(ArgAction::Set)
                        .value_parser(validator_role()),
                ),
        )
        .subcommand(
            Command::new("service-requests")
                .about("List every service request (admin)")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Only show requests with this status")
                        .action(ArgAction::Set)
                        .value_parser(validator_status()),
                ),
        )
        .subcommand(Command::new("stats").about("Show dashboard totals (admin)"));

    global::with_args(command)
}
