//! Request building and response decoding

use crate::error::{extract_message, HttpError};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

/// Helper for building and executing a single request
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: Url, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url,
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                self.headers.insert(AUTHORIZATION, value);
            }
        }
        self
    }

    /// Add query parameters to the request
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, HttpError> {
        // Round-trip through JSON so any flat struct with optional fields works.
        if let Value::Object(map) = serde_json::to_value(params)? {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(text) => self.query_params.push((key, text)),
                    other => self.query_params.push((key, other.to_string())),
                }
            }
        }
        Ok(self)
    }

    /// Add a JSON body to the request
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, HttpError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(self) -> (RequestBuilder, String) {
        let mut url = self.url;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        let line = format!("{} {}", self.method, url.path());
        let mut req = self.client.request(self.method, url).headers(self.headers);
        if let Some(body) = self.body {
            req = req.body(body);
        }
        (req, line)
    }

    /// Execute the request and decode the JSON response
    ///
    /// An empty 2xx body decodes as JSON `null`, so `()` and `Value`
    /// both work for endpoints that answer with no content.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let (req, line) = self.build();
        debug!("{}", line);

        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            let message = body.as_ref().and_then(extract_message);
            debug!("{} failed with {}", line, status);
            return Err(HttpError::Api {
                status,
                message,
                body,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
