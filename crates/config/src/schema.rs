use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use storefront_types::StorefrontError;

/// Prefix for environment overrides (`STOREFRONT_BASE_URL`, `STOREFRONT_LOG__LEVEL`, …).
pub const ENV_PREFIX: &str = "STOREFRONT_";

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_refresh_path() -> String {
    "/auth/refresh-token".to_string()
}
fn default_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive (defaults to `info`); `RUST_LOG` wins when set.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin every request path is joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall per-request timeout in seconds (defaults to 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Entry point the session listener is sent to on unrecoverable auth failure.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Path of the token refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Session database path (defaults to `~/.storefront/session.db`).
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            db_path: None,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from defaults, an optional YAML file, then the
    /// environment, later layers overriding earlier ones.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be parsed or a value
    /// has the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Session database location, falling back to `~/.storefront/session.db`.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".storefront").join("session.db")
        })
    }

    /// Rejects values the client cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(StorefrontError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StorefrontError::Config("timeout_secs must be > 0".into()));
        }
        if !self.refresh_path.starts_with('/') {
            return Err(StorefrontError::Config(format!(
                "refresh_path must start with '/', got {:?}",
                self.refresh_path
            )));
        }
        Ok(())
    }
}
