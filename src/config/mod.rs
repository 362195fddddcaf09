//! Configuration module for the availability collector.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Per-invocation inputs (directories, credentials, sheet ids) come from the command line.

use std::env;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of the human readable format
    pub log_json: bool,
    /// Base URL of the Spond API
    pub spond_api_base: String,
    /// Timeout for each Spond API request
    pub spond_timeout: Duration,
    /// Base URL of the Google Sheets v4 API
    pub sheets_api_base: String,
    /// OAuth access token for the Google Sheets API
    pub google_access_token: Option<String>,
    /// Number of Sheets API requests allowed per window
    pub sheets_rate_limit: u32,
    /// Length of the Sheets API rate limit window
    pub sheets_rate_window: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("SPOND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("SPOND_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let spond_api_base = env::var("SPOND_API_BASE")
            .unwrap_or_else(|_| "https://api.spond.com/core/v1".to_string());

        let spond_timeout = Duration::from_secs(parse_var("SPOND_HTTP_TIMEOUT_SECS", 450)?);

        let sheets_api_base = env::var("SHEETS_API_BASE")
            .unwrap_or_else(|_| "https://sheets.googleapis.com/v4".to_string());

        let google_access_token = env::var("GOOGLE_ACCESS_TOKEN").ok();

        let sheets_rate_limit = parse_var("SHEETS_RATE_LIMIT", 10)?;
        if sheets_rate_limit == 0 {
            return Err(AppError::Config(
                "SHEETS_RATE_LIMIT must be greater than zero".to_string(),
            ));
        }

        let sheets_rate_window = Duration::from_secs(parse_var("SHEETS_RATE_WINDOW_SECS", 15)?);

        Ok(Self {
            log_level,
            log_json,
            spond_api_base,
            spond_timeout,
            sheets_api_base,
            google_access_token,
            sheets_rate_limit,
            sheets_rate_window,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid {} value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
