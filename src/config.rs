use std::env;
use std::time::Duration;

use thiserror::Error;

/// Polling cadence used when the host does not configure one.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(30_000);
/// Display label used when the host does not configure one.
pub const DEFAULT_NAME: &str = "Shelly H&T";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: `{0}` is required (serverUrl, deviceId and authorizationKey must all be provided)")]
    MissingField(&'static str),
    #[error("invalid configuration: polling interval `{0}` is not a number of milliseconds")]
    InvalidPollingInterval(String),
}

/// Immutable per-accessory configuration, validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryConfig {
    pub server_url: String,
    pub device_id: String,
    pub authorization_key: String,
    pub polling_interval: Duration,
    pub name: String,
}

impl AccessoryConfig {
    /// Validates the three required fields and fills in defaults for the rest.
    /// The optional fields are public and may be overridden after construction.
    pub fn new(
        server_url: impl Into<String>,
        device_id: impl Into<String>,
        authorization_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let server_url = server_url.into();
        let device_id = device_id.into();
        let authorization_key = authorization_key.into();

        if server_url.is_empty() {
            return Err(ConfigError::MissingField("serverUrl"));
        }
        if device_id.is_empty() {
            return Err(ConfigError::MissingField("deviceId"));
        }
        if authorization_key.is_empty() {
            return Err(ConfigError::MissingField("authorizationKey"));
        }

        Ok(Self {
            server_url,
            device_id,
            authorization_key,
            polling_interval: DEFAULT_POLLING_INTERVAL,
            name: DEFAULT_NAME.to_string(),
        })
    }

    /// Loads the configuration surface from the environment:
    /// `SHELLY_SERVER_URL`, `SHELLY_DEVICE_ID`, `SHELLY_AUTH_KEY` (required),
    /// `SHELLY_POLL_MS` and `SHELLY_NAME` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = env::var("SHELLY_SERVER_URL").unwrap_or_default();
        let device_id = env::var("SHELLY_DEVICE_ID").unwrap_or_default();
        let authorization_key = env::var("SHELLY_AUTH_KEY").unwrap_or_default();

        let mut config = Self::new(server_url, device_id, authorization_key)?;

        if let Ok(raw_interval) = env::var("SHELLY_POLL_MS") {
            let millis: u64 = raw_interval
                .parse()
                .map_err(|_| ConfigError::InvalidPollingInterval(raw_interval))?;
            config.polling_interval = Duration::from_millis(millis);
        }
        if let Ok(name) = env::var("SHELLY_NAME") {
            if !name.is_empty() {
                config.name = name;
            }
        }

        Ok(config)
    }
}
