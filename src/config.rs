//! Connection settings for the Cloudflare R2 endpoint.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_REGION: &str = "auto";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, PartialEq)]
pub struct R2Config {
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Upper bound for a single storage request, transfers included.
    pub request_timeout: Duration,
}

impl R2Config {
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: DEFAULT_REGION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load the configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let endpoint = required("R2_ENDPOINT")?;
        let access_key_id = required("R2_ACCESS_KEY_ID")?;
        let secret_access_key = required("R2_SECRET_ACCESS_KEY")?;

        let region = optional("R2_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let request_timeout = match optional("R2_REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "R2_REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        log::info!("Loaded R2 configuration for endpoint: {}", endpoint);

        Ok(Self {
            endpoint,
            access_key_id,
            secret_access_key,
            region,
            request_timeout,
        })
    }
}

impl fmt::Debug for R2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("R2Config")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}
