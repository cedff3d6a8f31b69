use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::api::sanitize_base_url;

pub const BACKEND_URL_VAR: &str = "EVOLANCE_BACKEND_URL";
pub const TIMEOUT_VAR: &str = "EVOLANCE_REQUEST_TIMEOUT_SECS";
pub const TOKEN_PATH_VAR: &str = "EVOLANCE_TOKEN_PATH";

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub token_path: PathBuf,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests do not have to touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup(BACKEND_URL_VAR).unwrap_or_else(|| {
            info!("{BACKEND_URL_VAR} not set, using default: {DEFAULT_BACKEND_URL}");
            DEFAULT_BACKEND_URL.to_string()
        });
        let backend_url = sanitize_base_url(backend_url).map_err(|err| ConfigError::Invalid {
            key: BACKEND_URL_VAR,
            reason: format!("{err:#}"),
        })?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let token_path = lookup(TOKEN_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            token_path,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        Ok(_) => Err(ConfigError::Invalid {
            key: TIMEOUT_VAR,
            reason: "must be greater than zero".into(),
        }),
        Err(err) => Err(ConfigError::Invalid {
            key: TIMEOUT_VAR,
            reason: err.to_string(),
        }),
    }
}

fn default_token_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("evolance").join("token"),
        None => {
            warn!("no config directory available, storing token under .evolance");
            PathBuf::from(".evolance").join("token")
        }
    }
}
