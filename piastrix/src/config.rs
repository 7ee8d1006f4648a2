//! Client configuration.
//!
//! A [`ClientConfig`] holds the merchant credentials and gateway connection
//! settings. It is built once per credential set and never changes afterwards.
//!
//! # Examples
//!
//! ```toml
//! shop_id = 112
//! secret_key = "SecretKey01"
//! base_url = "https://core.piastrix.com/"
//! timeout_secs = 10
//! ```

use std::{fmt, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::error::{PiastrixError, Result};

/// Default gateway API base URL.
pub const DEFAULT_BASE_URL: &str = "https://core.piastrix.com/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for `timeout_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Shared secret known only to the merchant and the gateway.
///
/// The value is wiped from memory on drop and redacted from `Debug` output.
/// It is never sent over the wire.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub struct SecretKey(Zeroizing<String>);

impl SecretKey {
    /// Wraps a secret string.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Returns the secret for hashing.
    #[must_use]
    pub(crate) fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SecretKey {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<String> for SecretKey {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}

/// Merchant credentials and gateway connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Merchant shop identifier.
    pub shop_id: u64,

    /// Shared signing secret.
    ///
    /// May be left out of the file and supplied through
    /// [`ClientConfig::from_file_with_secret`].
    #[serde(default)]
    pub secret_key: SecretKey,

    /// Gateway API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Creates a configuration with the default base URL and timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{ClientConfig, SecretKey};
    ///
    /// let config = ClientConfig::new(112, SecretKey::new("SecretKey01"));
    /// assert_eq!(config.base_url, "https://core.piastrix.com/");
    /// assert_eq!(config.timeout_secs, 10);
    /// ```
    #[must_use]
    pub fn new(shop_id: u64, secret_key: SecretKey) -> Self {
        Self {
            shop_id,
            secret_key,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Overrides the gateway base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml(
    ///     r#"
    ///     shop_id = 112
    ///     secret_key = "SecretKey01"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.shop_id, 112);
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config = Self::parse(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] if the file cannot be read or is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_secret(path, None)
    }

    /// Reads a TOML configuration file, replacing its secret if `secret` is given.
    ///
    /// Validation runs after the replacement, so the file may omit
    /// `secret_key` when the secret comes from elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] if the file cannot be read or the
    /// resulting configuration is invalid.
    pub fn from_file_with_secret<P: AsRef<Path>>(
        path: P,
        secret: Option<SecretKey>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            let path = path.display();
            PiastrixError::Config(format!("cannot read config file {path}: {e}"))
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(secret) = secret {
            config.secret_key = secret;
        }
        config.validate()?;
        Ok(config)
    }

    fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| config_error(format!("invalid TOML config: {e}")))
    }

    /// Validates configuration values.
    ///
    /// Checks that:
    /// - the secret is not empty
    /// - `base_url` parses, uses `http` or `https`, and has a host
    /// - `timeout_secs` is between 1 and 300
    ///
    /// # Errors
    ///
    /// Returns [`PiastrixError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(config_error("secret_key must not be empty"));
        }

        let base_url = &self.base_url;
        let url = Url::parse(base_url)
            .map_err(|e| config_error(format!("invalid url {base_url}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            let scheme = url.scheme();
            return Err(config_error(format!(
                "base_url must use http or https, got: {scheme}"
            )));
        }
        if url.host_str().is_none() {
            return Err(config_error(format!("base_url has no host: {base_url}")));
        }

        if !(1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(config_error(format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins an endpoint path onto the base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use piastrix::{ClientConfig, SecretKey};
    ///
    /// let config = ClientConfig::new(1, SecretKey::new("k"));
    /// assert_eq!(config.endpoint_url("/bill/create"), "https://core.piastrix.com/bill/create");
    /// ```
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }
}

fn config_error(message: impl Into<String>) -> PiastrixError {
    PiastrixError::Config(message.into())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
