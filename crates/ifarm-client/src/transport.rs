//! Transport seam between the client and the wire.
//!
//! Everything above this trait deals in [`RequestDescriptor`]s and raw
//! status/body pairs; everything below is reqwest. Tests substitute a
//! scripted transport (see [`crate::testing::MockTransport`]).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use ifarm_core::{IfarmError, Result};

use crate::request::{Method, RequestDescriptor};

/// Fixed overall per-request deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A transport-level failure: no HTTP response was received.
#[derive(Debug, Clone)]
pub enum TransportError {
    /// The deadline elapsed.
    Timeout(String),
    /// Connectivity failure.
    Connect(String),
    /// The request could not be built or sent at all.
    Build(String),
}

impl TransportError {
    /// The user-facing notice for this class of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "请求超时，请稍后重试",
            TransportError::Connect(_) => "网络连接失败，请检查网络",
            TransportError::Build(_) => "请求配置错误",
        }
    }
}

impl From<TransportError> for IfarmError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(detail) => IfarmError::timeout(detail),
            TransportError::Connect(detail) => IfarmError::network(detail),
            TransportError::Build(detail) => IfarmError::config(detail),
        }
    }
}

/// An HTTP response as seen below the envelope layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Parsed JSON body; `None` when the body is absent or not JSON.
    pub body: Option<Value>,
}

impl RawResponse {
    /// Whether the transport status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a prepared request descriptor and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> std::result::Result<RawResponse, TransportError>;
}

/// Production transport backed by a configured [`reqwest::Client`].
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport against `base_url` with the fixed deadline and
    /// JSON defaults applied to every call.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| IfarmError::config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> std::result::Result<RawResponse, TransportError> {
        let url = self.full_url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(err.to_string())
            } else if err.is_builder() {
                TransportError::Build(err.to_string())
            } else {
                TransportError::Connect(err.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => serde_json::from_str::<Value>(&text).ok(),
            Err(_) => None,
        };

        Ok(RawResponse { status, body })
    }
}
