//! Configuration module for the catch log backend.
//!
//! All configuration is loaded from environment variables. The store URL and
//! access key are required; everything else has a default.

use std::env;
use std::net::SocketAddr;

use secrecy::Secret;

pub const STORE_URL_VAR: &str = "SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "SUPABASE_KEY";
pub const TABLE_VAR: &str = "CATCHLOG_TABLE";
pub const BIND_ADDR_VAR: &str = "CATCHLOG_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "CATCHLOG_LOG_LEVEL";

const DEFAULT_TABLE: &str = "catches";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection settings for the remote store.
#[derive(Debug)]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `https://project.supabase.co`
    pub url: String,
    /// Access key sent with every store request
    pub key: Secret<String>,
    /// Table holding the catch rows
    pub table: String,
}

impl StoreConfig {
    /// Load store settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env())
    }

    /// Load store settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, STORE_URL_VAR)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: STORE_URL_VAR,
                reason: "expected an http(s) URL".to_string(),
            });
        }

        let key = Secret::new(required(&lookup, STORE_KEY_VAR)?);

        let table = lookup(TABLE_VAR)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key,
            table,
        })
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug)]
pub struct Config {
    pub store: StoreConfig,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig::from_lookup(&lookup)?;

        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                reason: e.to_string(),
            })?;

        let log_level = lookup(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            store,
            bind_addr,
            log_level,
        })
    }
}

/// Variable lookup over the process environment, after merging `.env`.
fn process_env() -> impl Fn(&str) -> Option<String> {
    dotenvy::dotenv().ok();
    |var| env::var(var).ok()
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}
