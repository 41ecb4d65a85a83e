//! Server configuration module.
//!
//! This module provides configuration loading for the demo search server
//! from environment variables.
//!
//! # Environment Variables
//!
//! - `QUICKSEARCH_LISTEN_PORT`: Port to listen on (default: `3000`)
//! - `QUICKSEARCH_SEED_USERS`: Number of generated users (default: `100`)
//! - `QUICKSEARCH_SEED`: Seed for user generation (default: `12345`)
//! - `QUICKSEARCH_PAGE_PREFIX`: Query prefix for page parameters (default: `p`)
//! - `QUICKSEARCH_FILTER_PREFIX`: Query prefix for filters (default: `f`)
//! - `QUICKSEARCH_SORT_PREFIX`: Query prefix for sorters (default: `s`)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)
//! - Every prefix is non-empty and contains no `.`, `&` or `=`

use crate::binding::SearchPrefixes;
use crate::constants::{DEFAULT_FILTER_PREFIX, DEFAULT_PAGE_PREFIX, DEFAULT_SORT_PREFIX};

/// Server configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`:
/// - `listen_port` is in the valid range (1-65535)
/// - `prefixes` are usable as query string prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on for HTTP requests.
    pub listen_port: u16,
    /// Number of users generated at startup.
    pub seed_users: usize,
    /// Seed for the user generator. The same seed yields the same users.
    pub seed: u64,
    /// Query string prefixes for page, filter and sort parameters.
    pub prefixes: SearchPrefixes,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: Self::DEFAULT_PORT,
            seed_users: Self::DEFAULT_SEED_USERS,
            seed: Self::DEFAULT_SEED,
            prefixes: SearchPrefixes::default(),
        }
    }
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default number of generated users.
    pub const DEFAULT_SEED_USERS: usize = 100;
    /// Default generator seed.
    pub const DEFAULT_SEED: u64 = 12345;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse
    /// or is not a usable prefix.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// Unset variables take their defaults.
    ///
    /// # Errors
    ///
    /// Same as `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_port = Self::load_listen_port(&lookup)?;
        let seed_users = load_parsed(&lookup, "QUICKSEARCH_SEED_USERS", Self::DEFAULT_SEED_USERS)?;
        let seed = load_parsed(&lookup, "QUICKSEARCH_SEED", Self::DEFAULT_SEED)?;
        let prefixes = SearchPrefixes {
            page: load_prefix(&lookup, "QUICKSEARCH_PAGE_PREFIX", DEFAULT_PAGE_PREFIX)?,
            filter: load_prefix(&lookup, "QUICKSEARCH_FILTER_PREFIX", DEFAULT_FILTER_PREFIX)?,
            sort: load_prefix(&lookup, "QUICKSEARCH_SORT_PREFIX", DEFAULT_SORT_PREFIX)?,
        };

        Ok(Self {
            listen_port,
            seed_users,
            seed,
            prefixes,
        })
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is set but not a valid port number.
    fn load_listen_port(lookup: &impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
        lookup("QUICKSEARCH_LISTEN_PORT").map_or(Ok(Self::DEFAULT_PORT), |value| {
            match value.parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(ConfigError::InvalidValue {
                    name: "QUICKSEARCH_LISTEN_PORT".to_string(),
                    message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                }),
            }
        })
    }
}

fn load_parsed<V: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: V,
) -> Result<V, ConfigError> {
    lookup(name).map_or(Ok(default), |value| {
        value.parse::<V>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a valid non-negative integer"),
        })
    })
}

fn load_prefix(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let Some(prefix) = lookup(name) else {
        return Ok(default.to_string());
    };

    if prefix.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if prefix.contains(['.', '&', '=']) {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{prefix}' must not contain '.', '&' or '='"),
        });
    }

    Ok(prefix)
}
