//! Configuration and settings management
//!
//! Loads credentials from environment variables and config files and defines
//! the polling and delivery constants.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Homework status endpoint of the Practicum API.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Seconds between two poll cycles.
pub const RETRY_TIME_SECS: u64 = 600;

/// Default HTTP timeout for Practicum API requests.
pub const PRACTICUM_HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum attempts for a single Telegram API call.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff between Telegram API attempts.
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for the Telegram API backoff.
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;

/// Names of the required environment variables, in check order.
pub const REQUIRED_KEYS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Get Practicum HTTP timeout from env or default.
///
/// Environment variable: `PRACTICUM_HTTP_TIMEOUT_SECS`.
#[must_use]
pub fn get_practicum_http_timeout_secs() -> u64 {
    std::env::var("PRACTICUM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(PRACTICUM_HTTP_TIMEOUT_SECS)
}

/// Errors raised by the startup credential check
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// One or more required variables are unset or empty
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// `TELEGRAM_CHAT_ID` is set but is not an integer
    #[error("TELEGRAM_CHAT_ID is not a valid chat id: {0}")]
    InvalidChatId(String),
}

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// OAuth token for the Practicum API
    pub practicum_token: Option<String>,
    /// Telegram Bot API token
    pub telegram_token: Option<String>,
    /// Telegram chat receiving the notifications
    pub telegram_chat_id: Option<String>,
}

/// Validated credentials required to start polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth token for the Practicum API
    pub practicum_token: String,
    /// Telegram Bot API token
    pub telegram_token: String,
    /// Telegram chat receiving the notifications
    pub chat_id: i64,
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use homework_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Checks that every required credential is present.
    ///
    /// All missing keys are reported at once so the operator can fix the
    /// environment in a single pass.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError::Missing` listing absent keys, or
    /// `CredentialsError::InvalidChatId` if the chat id does not parse.
    pub fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let values = [
            non_empty(self.practicum_token.as_deref()),
            non_empty(self.telegram_token.as_deref()),
            non_empty(self.telegram_chat_id.as_deref()),
        ];

        let missing: Vec<&'static str> = REQUIRED_KEYS
            .iter()
            .zip(values.iter())
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();

        let [Some(practicum_token), Some(telegram_token), Some(chat_id)] = values else {
            return Err(CredentialsError::Missing(missing));
        };

        let chat_id = chat_id
            .trim()
            .parse::<i64>()
            .map_err(|_| CredentialsError::InvalidChatId(chat_id.to_string()))?;

        Ok(Credentials {
            practicum_token: practicum_token.to_string(),
            telegram_token: telegram_token.to_string(),
            chat_id,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Builds the layered configuration source.
///
/// # Errors
///
/// Returns a `ConfigError` if a present config file is malformed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Local overrides, not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__TELEGRAM_CHAT_ID=1 ./homework-bot`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Environment::default() maps UPPER_SNAKE_CASE to snake_case
        .add_source(Environment::default().ignore_empty(true))
        .build()
}
