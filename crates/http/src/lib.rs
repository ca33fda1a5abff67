//! HTTP client wrapper for the PulsObywateli REST API
//!
//! Every outbound call of the client goes through [`ApiClient`]: one base
//! address, one shared `reqwest::Client` and one default bearer token that
//! the session layer attaches and detaches.

pub mod error;
pub mod fetch;

pub use error::{ErrorKind, HttpError};
pub use reqwest::{Method, StatusCode};

use fetch::FetchBuilder;
use log::{debug, warn};
use reqwest::{header::HeaderValue, Client};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use url::Url;

pub type Result<T> = std::result::Result<T, HttpError>;

/// Configured REST client
///
/// Clones share the bearer token, so configuring auth on one clone is
/// visible to every other holder.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http_client: Client,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `https://host/api`)
    pub fn new(base_url: &str, http_client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self {
            base_url,
            http_client,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// The base address every path is appended to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Set or clear the default `Authorization: Bearer` header
    ///
    /// A token that is not a valid header value is refused and the
    /// current one is kept.
    pub fn configure_auth(&self, access_token: Option<&str>) -> Result<()> {
        if let Some(token) = access_token {
            if HeaderValue::from_str(&format!("Bearer {}", token)).is_err() {
                warn!("refusing bearer token that is not a valid header value");
                return Err(HttpError::InvalidToken);
            }
        }
        let mut bearer = self.bearer.write().unwrap_or_else(PoisonError::into_inner);
        match access_token {
            Some(_) => debug!("bearer token configured"),
            None if bearer.is_some() => debug!("bearer token cleared"),
            None => {}
        }
        *bearer = access_token.map(str::to_string);
        Ok(())
    }

    /// The token currently attached to outgoing requests
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// Start a request with the default headers applied
    pub fn fetch(&self, method: Method, path: &str) -> Result<FetchBuilder<'_>> {
        let url = self.endpoint(path)?;
        let token = self.bearer_token();
        Ok(FetchBuilder::new(&self.http_client, url, method).bearer_auth(token.as_deref()))
    }

    /// Issue one request and return the parsed JSON body
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let mut builder = self.fetch(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body)?;
        }
        builder.execute().await
    }

    /// GET and decode
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(Method::GET, path)?.execute().await
    }

    /// GET with query parameters taken from a flat serializable value
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.fetch(Method::GET, path)?.query(query)?.execute().await
    }

    /// POST a JSON body and decode
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch(Method::POST, path)?.json(body)?.execute().await
    }

    /// PUT a JSON body and decode
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch(Method::PUT, path)?.json(body)?.execute().await
    }

    /// PATCH a JSON body and decode
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch(Method::PATCH, path)?.json(body)?.execute().await
    }

    /// DELETE and decode
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(Method::DELETE, path)?.execute().await
    }
}
