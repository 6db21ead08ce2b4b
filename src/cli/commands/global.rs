//! Arguments shared by every subcommand: where the API lives, where the
//! session is stored, and how chatty the logs are.

use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_STORAGE_DIR: &str = "storage-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepts a level name or a number from 0 to 5.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        match level.trim().to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            other => other
                .parse::<u8>()
                .ok()
                .filter(|parsed| *parsed <= 5)
                .ok_or_else(|| format!("invalid log level: {level}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Marketplace API base URL, including the /api prefix")
                .env("AGRIDRONE_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORAGE_DIR)
                .long(ARG_STORAGE_DIR)
                .help("Directory holding the stored session")
                .env("AGRIDRONE_STORAGE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("AGRIDRONE_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("AGRIDRONE_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
