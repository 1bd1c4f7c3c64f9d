//! Client configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory:
//!
//! | variable | default |
//! |---|---|
//! | `MARVEL_BASE_URL` | `https://gateway.marvel.com` |
//! | `MARVEL_PUBLIC_KEY` | unset |
//! | `MARVEL_PRIVATE_KEY` | unset |
//! | `MARVEL_TIMEOUT_SECS` | unset (HTTP client default) |
//!
//! The two keys must be set together.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::auth::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://gateway.marvel.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{set} is set but {missing} is not")]
    IncompleteCredentials {
        set: &'static str,
        missing: &'static str,
    },

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("base URL must not be empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            public_key: None,
            private_key: None,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(
        mut self,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.public_key = Some(public_key.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Load from the environment after applying an optional `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get("MARVEL_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "MARVEL_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        let config = Self {
            base_url: get("MARVEL_BASE_URL").unwrap_or_else(default_base_url),
            public_key: get("MARVEL_PUBLIC_KEY"),
            private_key: get("MARVEL_PRIVATE_KEY"),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        match (&self.public_key, &self.private_key) {
            (Some(_), None) => Err(ConfigError::IncompleteCredentials {
                set: "MARVEL_PUBLIC_KEY",
                missing: "MARVEL_PRIVATE_KEY",
            }),
            (None, Some(_)) => Err(ConfigError::IncompleteCredentials {
                set: "MARVEL_PRIVATE_KEY",
                missing: "MARVEL_PUBLIC_KEY",
            }),
            _ => Ok(()),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.public_key, &self.private_key) {
            (Some(public), Some(private)) => Some(Credentials::new(public, private)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
