//! Process configuration read from the environment.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use brewery_observability::{LogFormat, ParseLogFormatError};

pub const BIND_ADDR_VAR: &str = "BREWERY_BIND_ADDR";
pub const SEED_DATA_VAR: &str = "BREWERY_SEED_DATA";
pub const LOG_FORMAT_VAR: &str = "BREWERY_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address ('{value}'): {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        source: AddrParseError,
    },

    #[error("{var} must be one of true/false/1/0/yes/no, got '{value}'")]
    InvalidFlag { var: &'static str, value: String },

    #[error(transparent)]
    InvalidLogFormat(#[from] ParseLogFormatError),
}

/// Runtime settings for the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the default catalog and tasting-room customer at startup.
    pub seed_data: bool,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset or blank variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match get(BIND_ADDR_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr {
                    var: BIND_ADDR_VAR,
                    value,
                    source,
                })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr {
                    var: BIND_ADDR_VAR,
                    value: DEFAULT_BIND_ADDR.to_string(),
                    source,
                })?,
        };

        let seed_data = match get(SEED_DATA_VAR) {
            Some(value) => parse_flag(SEED_DATA_VAR, value)?,
            None => true,
        };

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            seed_data,
            log_format,
        })
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value }),
    }
}
