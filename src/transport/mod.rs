//! HTTP transport consumed by the search client.
//!
//! The client never talks to the network directly. Every call goes through a
//! [`Transport`], which takes a fully built [`HttpRequest`] and returns the raw
//! response body. Two implementations ship with the crate:
//!
//! - [`ReqwestTransport`]: real HTTP(S) via reqwest, with configurable
//!   certificate validation
//! - [`MockTransport`]: scripted responses and a request log, for tests

mod http;
pub mod mock;

pub use self::http::ReqwestTransport;
pub use mock::MockTransport;

use ::http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use ::http::{HeaderMap, Method};
use async_trait::async_trait;

/// Performs HTTP requests on behalf of the client.
///
/// Certificate validation and timeouts are fixed when the transport is built,
/// not negotiated per call.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send a request and return the response body
    async fn request(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError>;
}

/// A single HTTP request
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add an `Authorization` header that is masked in debug output
    pub fn authorization(mut self, value: &str) -> Result<Self, TransportError> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Build(format!("Invalid authorization value: {}", e)))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Set a url-encoded form body
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = Some(body);
        self
    }

    /// Look up a form field in the body, decoded
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.body.as_deref()?.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            if urlencoding::decode(k).ok()? == key {
                urlencoding::decode(v).ok().map(|v| v.into_owned())
            } else {
                None
            }
        })
    }
}

impl std::fmt::Debug for HttpRequest {
    // The body may carry a password
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(String::len))
            .finish()
    }
}

/// Errors raised by a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or I/O failure
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The request could not be built
    #[error("Invalid request: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}
