use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Default review API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Upper bound for `REQUEST_TIMEOUT_SECS`.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth token for the review API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives status notifications
    pub telegram_chat_id: String,

    /// Review API endpoint
    pub endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Pause between polling iterations (default: 600 s)
    pub retry_period: Duration,

    /// Timeout applied to every outbound HTTP request (default: 30 s)
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables, honouring a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(AppError::ConfigMissing(key));

        let practicum_token = required("PRACTICUM_TOKEN")?;
        let telegram_token = required("TELEGRAM_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let request_timeout_secs =
            parse_u64(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 30)?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&request_timeout_secs) {
            return Err(AppError::Config(format!(
                "REQUEST_TIMEOUT_SECS must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}"
            )));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: get("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period: Duration::from_secs(parse_u64(
                get("RETRY_PERIOD_SECS"),
                "RETRY_PERIOD_SECS",
                600,
            )?),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

/// Logging sinks configuration. Loaded before `AppConfig` so that a missing
/// secret can itself be logged.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Rotating log file path (default: `log.log`)
    pub file: PathBuf,

    /// Size at which the log file is rotated (default: 50 MB)
    pub max_bytes: usize,

    /// Number of rotated backups kept (default: 5)
    pub backup_count: usize,

    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl LogConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            file: get("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("log.log")),
            max_bytes: parse_usize(get("LOG_MAX_BYTES"), "LOG_MAX_BYTES", 50_000_000)?,
            backup_count: parse_usize(get("LOG_BACKUP_COUNT"), "LOG_BACKUP_COUNT", 5)?,
            default_filter: "homework=debug".to_string(),
        })
    }
}

fn parse_u64(value: Option<String>, key: &str, default: u64) -> Result<u64, AppError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} must be a valid u64"))),
        None => Ok(default),
    }
}

fn parse_usize(value: Option<String>, key: &str, default: u64) -> Result<usize, AppError> {
    let raw = parse_u64(value, key, default)?;
    usize::try_from(raw)
        .map_err(|_| AppError::Config(format!("{key} is too large for this platform")))
}
