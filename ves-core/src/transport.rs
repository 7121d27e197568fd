//! Collector Transport
//!
//! The delivery agent hands encoded bodies to a [`Transport`]. The HTTP
//! implementation posts them with basic authentication and treats any 2xx
//! status as success. A non-empty response body is returned so collector
//! commands can be applied.

use crate::config::CollectorConfig;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

/// Destination of a POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The event listener
    Events,
    /// The throttling state API
    Throttling,
}

/// Transport error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collector returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Sink for encoded event bodies
pub trait Transport: Send {
    /// Send `body` to `target`, returning the response body if it has one
    fn send(&mut self, body: &str, target: Target) -> Result<Option<String>, TransportError>;
}

/// Blocking HTTP transport to a VES collector
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    events_url: String,
    throttling_url: String,
    username: String,
    password: String,
}

impl HttpTransport {
    pub fn new(config: &CollectorConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.api_timeout())
            .timeout(config.api_timeout())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let events_url = config.events_url();
        let throttling_url = config.throttling_url();
        info!(url = %events_url, "Event listener API");
        info!(url = %throttling_url, "Event throttling API");

        Ok(Self {
            client,
            events_url,
            throttling_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn url(&self, target: Target) -> &str {
        match target {
            Target::Events => &self.events_url,
            Target::Throttling => &self.throttling_url,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, body: &str, target: Target) -> Result<Option<String>, TransportError> {
        let url = self.url(target);
        debug!(url, bytes = body.len(), "Posting to collector");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(status = status.as_u16(), "Collector accepted post");
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}
