//! Client configuration for the marketplace API and the durable session storage.
//! Values come from CLI flags (with environment fallbacks) layered over built-in
//! defaults. Configuration values are public; do not store secrets here.

use crate::errors::AppError;
use directories::ProjectDirs;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Default marketplace API, including the `/api` prefix.
pub const DEFAULT_API_BASE_URL: &str = "https://agridrone.onrender.com/api";
/// Default request timeout in seconds applied to every API call.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Client configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_dir: PathBuf,
    pub timeout: Duration,
}

/// Optional overrides, usually collected from CLI arguments.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub storage_dir: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl AppConfig {
    /// Builds the config from defaults and applies the provided overrides.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the API base URL is not an http(s) URL or no
    /// storage directory can be determined.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AppError> {
        let storage_dir = match overrides
            .storage_dir
            .as_deref()
            .and_then(normalize_value)
        {
            Some(dir) => PathBuf::from(dir),
            None => default_storage_dir()?,
        };

        let mut config = Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        };

        apply_overrides(&mut config, overrides);
        validate_base_url(&config.api_base_url)?;

        Ok(config)
    }
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_base_url.as_deref().and_then(normalize_value) {
        config.api_base_url = value;
    }
    if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
        config.timeout = Duration::from_secs(seconds);
    }
}

fn default_storage_dir() -> Result<PathBuf, AppError> {
    ProjectDirs::from("dev", "agridrone", "agridrone")
        .map(|dirs| dirs.data_dir().join("storage"))
        .ok_or_else(|| {
            AppError::Config("Unable to determine a storage directory; pass --storage-dir.".into())
        })
}

fn validate_base_url(value: &str) -> Result<(), AppError> {
    let url = Url::parse(value)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {value}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::Config(format!(
            "Unsupported API base URL scheme: {scheme}"
        ))),
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
