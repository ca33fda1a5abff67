//! Configuration options for the PulsObywateli client

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Origin used when nothing else is configured (the development backend)
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Configuration options for the PulsObywateli client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Scheme, host and port of the backend
    pub origin: String,

    /// Path prefix of every REST endpoint
    pub api_prefix: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Directory of the file token store; tokens stay in memory when unset
    pub storage_dir: Option<PathBuf>,

    /// How long a cached read stays fresh
    pub query_stale_time: Duration,

    /// Revoke the refresh token on the server during logout
    pub revoke_on_logout: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            api_prefix: "/api".to_string(),
            request_timeout: None,
            storage_dir: None,
            query_stale_time: Duration::from_secs(30),
            revoke_on_logout: false,
        }
    }
}

impl ClientOptions {
    /// Read options from the environment, loading `.env` first
    ///
    /// Recognised variables: `PULS_API_ORIGIN`, `PULS_API_PREFIX`,
    /// `PULS_STORAGE_DIR` and `PULS_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut options = Self::default();
        if let Ok(origin) = env::var("PULS_API_ORIGIN") {
            options = options.with_origin(&origin);
        }
        if let Ok(prefix) = env::var("PULS_API_PREFIX") {
            options = options.with_api_prefix(&prefix);
        }
        if let Ok(dir) = env::var("PULS_STORAGE_DIR") {
            options = options.with_storage_dir(dir);
        }
        if let Ok(secs) = env::var("PULS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("PULS_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            options = options.with_request_timeout(Some(Duration::from_secs(secs)));
        }

        options.api_base_url()?;
        Ok(options)
    }

    /// Set the backend origin
    pub fn with_origin(mut self, value: &str) -> Self {
        self.origin = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Persist tokens in `dir` instead of memory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Set how long cached reads stay fresh
    pub fn with_query_stale_time(mut self, value: Duration) -> Self {
        self.query_stale_time = value;
        self
    }

    /// Set whether logout revokes the refresh token on the server
    pub fn with_revoke_on_logout(mut self, value: bool) -> Self {
        self.revoke_on_logout = value;
        self
    }

    /// Origin joined with the API prefix, e.g. `http://localhost:8000/api`
    pub fn api_base_url(&self) -> Result<Url> {
        let origin = Url::parse(&self.origin)?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported scheme in origin: {}",
                self.origin
            )));
        }
        let prefix = self.api_prefix.trim_matches('/');
        let base = if prefix.is_empty() {
            self.origin.trim_end_matches('/').to_string()
        } else {
            format!("{}/{}", self.origin.trim_end_matches('/'), prefix)
        };
        Ok(Url::parse(&base)?)
    }

    /// Build the shared HTTP client
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| Error::Http(puls_obywateli_http::HttpError::Network(err)))
    }
}
