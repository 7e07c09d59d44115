//! Client configuration.
//!
//! Values are resolved once, when the configuration is built: an explicit
//! argument wins over the environment, which wins over the built-in default.
//! Request methods never read the environment.

use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Production endpoint of the blob API.
pub const DEFAULT_BASE_URL: &str = "https://blob.vercel-storage.com";

/// API version sent in the `x-api-version` header.
pub const DEFAULT_API_VERSION: u32 = 7;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Overrides the API base URL.
pub const BASE_URL_ENV: &str = "VERCEL_BLOB_API_URL";

/// Overrides the API version.
pub const API_VERSION_ENV: &str = "VERCEL_BLOB_API_VERSION_OVERRIDE";

/// Read/write token used when none is passed explicitly.
pub const TOKEN_ENV: &str = "BLOB_READ_WRITE_TOKEN";

/// Configuration for a [`BlobClient`](crate::BlobClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token. Empty when none was configured; the server then rejects
    /// requests with `forbidden`.
    pub token: String,
    /// Value of the `x-api-version` header.
    pub api_version: u32,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Request timeout applied to the transport built by the client.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with an explicit token and the built-in defaults,
    /// ignoring the environment.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_version: DEFAULT_API_VERSION,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve the configuration from the process environment.
    ///
    /// Reads:
    /// - `BLOB_READ_WRITE_TOKEN` (used when `token` is `None` or empty)
    /// - `VERCEL_BLOB_API_URL` (optional, defaults to [`DEFAULT_BASE_URL`])
    /// - `VERCEL_BLOB_API_VERSION_OVERRIDE` (optional, defaults to [`DEFAULT_API_VERSION`])
    pub fn from_env(token: Option<String>) -> Self {
        Self::from_lookup(token, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration against an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(token: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let token = token
            .filter(|t| !t.is_empty())
            .or_else(|| lookup(TOKEN_ENV))
            .unwrap_or_default();

        let api_version = match lookup(API_VERSION_ENV) {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(
                    value = %raw,
                    "ignoring unparseable {API_VERSION_ENV}, using default"
                );
                DEFAULT_API_VERSION
            }),
            None => DEFAULT_API_VERSION,
        };

        let base_url = lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            token,
            api_version,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env(None)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(None, lookup_in(&[]));
        assert_eq!(config.token, "");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn explicit_token_wins_over_environment() {
        let config = ClientConfig::from_lookup(
            Some("explicit".into()),
            lookup_in(&[(TOKEN_ENV, "from-env")]),
        );
        assert_eq!(config.token, "explicit");
    }

    #[test]
    fn token_falls_back_to_environment() {
        let config = ClientConfig::from_lookup(None, lookup_in(&[(TOKEN_ENV, "from-env")]));
        assert_eq!(config.token, "from-env");

        let config =
            ClientConfig::from_lookup(Some(String::new()), lookup_in(&[(TOKEN_ENV, "from-env")]));
        assert_eq!(config.token, "from-env");
    }

    #[test]
    fn environment_overrides_url_and_version() {
        let config = ClientConfig::from_lookup(
            None,
            lookup_in(&[
                (BASE_URL_ENV, "http://localhost:3000/"),
                (API_VERSION_ENV, "9"),
            ]),
        );
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.api_version, 9);
    }

    #[test]
    fn empty_or_invalid_overrides_use_defaults() {
        let config = ClientConfig::from_lookup(
            None,
            lookup_in(&[(BASE_URL_ENV, ""), (API_VERSION_ENV, "seven")]),
        );
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("tok")
            .with_base_url("http://127.0.0.1:9000/")
            .with_api_version(8)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.token, "tok");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api_version, 8);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
