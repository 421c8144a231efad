//! Client configuration.
//!
//! Defaults come from `config/default.toml`, embedded at compile time. An
//! optional TOML file and then environment variables override them.

use std::path::Path;

use serde::Deserialize;

use crate::ApiError;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "ACCIDENT_MAP_API_URL";
/// Environment variable overriding [`ApiConfig::timeout_secs`].
pub const API_TIMEOUT_ENV: &str = "ACCIDENT_MAP_API_TIMEOUT_SECS";

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the aggregation API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

/// Partial configuration read from a user-supplied file.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl ApiConfig {
    /// The embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, ApiError> {
        let mut config: Self = toml::de::from_str(DEFAULT_TOML).map_err(|e| ApiError::Config {
            message: format!("Failed to parse embedded config: {e}"),
        })?;
        config.normalize();
        Ok(config)
    }

    /// The embedded defaults overlaid with the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let mut config = Self::embedded()?;
        config.merge_file(path)?;
        Ok(config)
    }

    /// Loads the embedded defaults, overlays `path` if given, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read or parsed, or
    /// if an environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ApiError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        log::debug!(
            "API config: base_url={} timeout={}s",
            config.base_url,
            config.timeout_secs
        );
        Ok(config)
    }

    /// Overlays the keys present in the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read or parsed.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ApiError> {
        let text = std::fs::read_to_string(path).map_err(|e| ApiError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        self.merge_toml(&text).map_err(|e| match e {
            ApiError::Config { message } => ApiError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Overlays the keys present in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `text` is not valid TOML for the
    /// config keys.
    pub fn merge_toml(&mut self, text: &str) -> Result<(), ApiError> {
        let overrides: ConfigOverrides =
            toml::de::from_str(text).map_err(|e| ApiError::Config {
                message: e.to_string(),
            })?;
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(user_agent) = overrides.user_agent {
            self.user_agent = user_agent;
        }
        self.normalize();
        Ok(())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the timeout override is not an
    /// integer.
    pub fn apply_env_with(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ApiError> {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(API_TIMEOUT_ENV) {
            self.timeout_secs = raw.trim().parse().map_err(|e| ApiError::Config {
                message: format!("{API_TIMEOUT_ENV}={raw:?} is not a number of seconds: {e}"),
            })?;
        }
        self.normalize();
        Ok(())
    }

    /// Replaces the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }
}
