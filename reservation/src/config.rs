//! Configuration management for the reservation desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::catalog::AvailabilityCatalog;
use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

/// Default reservation server
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "room_desk_reservation=debug,room_desk_runtime=debug";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reservation server base URL (`ROOM_DESK_API_URL`)
    pub api_url: String,
    /// Operator identity sent as `X-Remote-User` (`ROOM_DESK_REMOTE_USER`)
    pub remote_user: Option<String>,
    /// Catalog file (`ROOM_DESK_CATALOG`); the built-in sample when unset
    pub catalog_path: Option<PathBuf>,
    /// Use the in-process server instead of HTTP (`ROOM_DESK_OFFLINE`)
    pub offline: bool,
    /// Tracing filter directive (`ROOM_DESK_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            remote_user: None,
            catalog_path: None,
            offline: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVar`] if `ROOM_DESK_OFFLINE` is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVar`] if `ROOM_DESK_OFFLINE` is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let offline = match non_empty("ROOM_DESK_OFFLINE") {
            None => defaults.offline,
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidVar {
                name: "ROOM_DESK_OFFLINE",
                value,
            })?,
        };

        Ok(Self {
            api_url: non_empty("ROOM_DESK_API_URL").unwrap_or(defaults.api_url),
            remote_user: non_empty("ROOM_DESK_REMOTE_USER"),
            catalog_path: non_empty("ROOM_DESK_CATALOG").map(PathBuf::from),
            offline,
            log_filter: non_empty("ROOM_DESK_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Load the configured catalog, or the sample catalog when none is set
    ///
    /// # Errors
    ///
    /// Returns the catalog's read or parse error.
    pub fn load_catalog(&self) -> Result<AvailabilityCatalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => AvailabilityCatalog::load(path),
            None => Ok(AvailabilityCatalog::sample()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
