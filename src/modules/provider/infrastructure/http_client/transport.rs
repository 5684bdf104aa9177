//! HTTP transport abstraction used by the throttled request queue
//!
//! The queue only needs "send this request, give me status and body"; keeping
//! that behind a trait lets tests script responses without a network.

use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Caller-supplied options for one queued request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Overrides the transport's default timeout
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

/// Target plus options of a call submitted to the queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedRequest {
    pub target: String,
    pub options: RequestOptions,
}

impl QueuedRequest {
    pub fn new(target: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            target: target.into(),
            options,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(target, RequestOptions::default())
    }

    pub fn post_json(target: impl Into<String>, body: Value) -> Self {
        Self::new(
            target,
            RequestOptions {
                method: HttpMethod::Post,
                body: Some(body),
                ..Default::default()
            },
        )
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }
}

/// Status, headers and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to parse response: {}. Response: {}",
                e,
                truncate(&self.body, 200)
            ))
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Any `Err` is treated by the queue as a transport-level failure (network
/// error, timeout) and is eligible for retry; HTTP error statuses come back
/// as `Ok` responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &QueuedRequest) -> AppResult<TransportResponse>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: Client,
    user_agent: String,
    default_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(user_agent: impl Into<String>, default_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(default_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
            default_timeout,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &QueuedRequest) -> AppResult<TransportResponse> {
        let method = match request.options.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self
            .client
            .request(method, request.target.as_str())
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        for (name, value) in &request.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        id: u32,
    }

    #[test]
    fn rate_limited_only_on_429() {
        assert!(TransportResponse::new(429, "").is_rate_limited());
        assert!(!TransportResponse::new(503, "").is_rate_limited());
        assert!(TransportResponse::new(204, "").is_success());
    }

    #[test]
    fn json_body_is_decoded() {
        let payload: Payload = TransportResponse::new(200, r#"{"id": 7}"#).json().unwrap();
        assert_eq!(payload.id, 7);
    }

    #[test]
    fn invalid_json_is_a_serialization_error() {
        let result: AppResult<Payload> = TransportResponse::new(200, "<html>").json();
        assert!(matches!(result, Err(AppError::SerializationError(_))));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut response = TransportResponse::new(429, "");
        response
            .headers
            .insert("retry-after".to_string(), "2".to_string());
        assert_eq!(response.header("Retry-After"), Some("2"));
    }

    #[test]
    fn request_builders_set_options() {
        let request = QueuedRequest::get("https://example.test/anime/1")
            .with_header("X-Trace", "abc")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(request.options.method, HttpMethod::Get);
        assert_eq!(request.options.headers.len(), 1);
        assert_eq!(request.options.timeout, Some(Duration::from_secs(5)));

        let post = QueuedRequest::post_json("https://example.test", serde_json::json!({"q": 1}));
        assert_eq!(post.options.method, HttpMethod::Post);
        assert!(post.options.body.is_some());
    }

    #[test]
    fn reqwest_transport_keeps_default_timeout() {
        let transport = ReqwestTransport::new("media-sync-test", Duration::from_secs(3)).unwrap();
        assert_eq!(transport.default_timeout(), Duration::from_secs(3));
    }
}
