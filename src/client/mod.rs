//! Generation endpoint client
//!
//! A [`Generator`] turns the current session into the next bot reply. The
//! production implementation, [`HttpGenerator`], posts the whole session to
//! the configured endpoint and expects `{ "status": "success", "content": … }`
//! back; anything else is reported as [`ScribeError::Generation`].

use crate::config::ApiConfig;
use crate::error::{Result, ScribeError};
use crate::session::Session;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces the next bot reply for a session
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply to the last message of `session`
    ///
    /// # Errors
    ///
    /// Returns [`ScribeError::Generation`] when the endpoint cannot be reached,
    /// times out, or reports a failure
    async fn generate(&self, session: &Session) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    session: &'a Session,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the generation endpoint
///
/// # Examples
///
/// ```
/// use scribe::client::HttpGenerator;
/// use scribe::config::ApiConfig;
///
/// let generator = HttpGenerator::new(ApiConfig::default()).unwrap();
/// assert_eq!(generator.endpoint(), "http://127.0.0.1:5000/generate");
/// ```
pub struct HttpGenerator {
    client: Client,
    config: ApiConfig,
}

impl HttpGenerator {
    /// Create a client with the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("scribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ScribeError::Http)?;

        tracing::info!(
            "Initialized generation client: endpoint={}, timeout={}s",
            config.endpoint,
            config.timeout_seconds
        );

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn describe_transport_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!(
                "Request timed out after {} seconds",
                self.config.timeout_seconds
            )
        } else if e.is_connect() {
            format!("Could not connect to {}", self.config.endpoint)
        } else {
            format!("Request failed: {}", e)
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, session: &Session) -> Result<String> {
        tracing::debug!(
            "Sending generation request: session={}, {} messages",
            session.id,
            session.messages.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&GenerateRequest { session })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Generation request failed: {}", e);
                ScribeError::Generation(self.describe_transport_error(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            let detail = response
                .json::<GenerateResponse>()
                .await
                .ok()
                .and_then(|body| body.message);
            tracing::error!("Generation endpoint returned {}: {:?}", status, detail);

            let message = match detail {
                Some(detail) => format!("API Error: {} ({})", reason, detail),
                None => format!("API Error: {}", reason),
            };
            return Err(ScribeError::Generation(message).into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse generation response: {}", e);
            ScribeError::Generation(format!("Failed to parse response: {}", e))
        })?;

        if body.status.as_deref() != Some("success") {
            let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
            tracing::warn!("Generation endpoint reported failure: {}", message);
            return Err(ScribeError::Generation(message).into());
        }

        let content = body.content.ok_or_else(|| {
            ScribeError::Generation("Response is missing generated content".to_string())
        })?;

        tracing::debug!("Received {} bytes of generated content", content.len());
        Ok(content)
    }
}
