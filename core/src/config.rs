//! Client configuration.
//!
//! A `ClientConfig` is fixed for the lifetime of a client. Clients share it
//! behind an `Arc`, so concurrent callers never observe a change.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Ceiling on pooled connections kept per remote host.
pub const MAX_CONNECTIONS_PER_HOST: usize = 128;

pub const ENV_API_CLIENT_ID: &str = "KONTUR_EDI_API_CLIENT_ID";
pub const ENV_BASE_URI: &str = "KONTUR_EDI_BASE_URI";
pub const ENV_TIMEOUT_MS: &str = "KONTUR_EDI_TIMEOUT_MS";
pub const ENV_PROXY: &str = "KONTUR_EDI_PROXY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_client_id: String,
    base_uri: String,
    timeout: Duration,
    proxy: Option<String>,
}

impl ClientConfig {
    pub fn new(api_client_id: &str, base_uri: &str) -> Self {
        Self {
            api_client_id: api_client_id.to_string(),
            base_uri: base_uri.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    /// Reads the configuration from `KONTUR_EDI_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(&required(ENV_API_CLIENT_ID)?, &required(ENV_BASE_URI)?);

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = raw
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_MS} is not an integer: {raw}")))?;
            config = config.with_timeout(Duration::from_millis(millis));
        }
        if let Some(proxy) = lookup(ENV_PROXY).filter(|value| !value.is_empty()) {
            config = config.with_proxy(&proxy);
        }
        Ok(config)
    }

    pub fn api_client_id(&self) -> &str {
        &self.api_client_id
    }

    /// Base URI without a trailing slash.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn max_connections_per_host(&self) -> usize {
        MAX_CONNECTIONS_PER_HOST
    }
}
