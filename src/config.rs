//! Client configuration read from the environment.

use std::time::Duration;

use crate::client::RemoteError;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
const ENV_API_URL: &str = "CLOUDCAST_API_URL";
const ENV_REQUEST_TIMEOUT_SECS: &str = "CLOUDCAST_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, RemoteError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RemoteError> {
        let api_url = lookup(ENV_API_URL)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());

        let timeout_secs = lookup(ENV_REQUEST_TIMEOUT_SECS)
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                let value = raw.parse::<u64>().map_err(|_| {
                    RemoteError::Configuration(format!(
                        "{ENV_REQUEST_TIMEOUT_SECS} must be a positive integer, got {raw:?}"
                    ))
                })?;
                if value == 0 {
                    return Err(RemoteError::Configuration(format!(
                        "{ENV_REQUEST_TIMEOUT_SECS} must be greater than zero"
                    )));
                }
                Ok(value)
            })
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
