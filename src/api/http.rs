//! HTTP transport for the chat backend.

use async_trait::async_trait;
use url::Url;

use super::{ChatBackend, ChatReply, ChatRequest, HealthReport};
use crate::config::ApiConfig;
use crate::error::{Result, WidgetError};

/// [`ChatBackend`] over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::api::{ChatBackend, ChatRequest, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8000")?;
/// let health = backend.health().await?;
/// println!("healthy: {}", health.is_healthy());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    health_url: Url,
    chat_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend using the default endpoint paths.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_paths(base_url, "/api/health", "/api/chat", reqwest::Client::new())
    }

    /// Create a backend from configuration.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::with_paths(
            &api.base_url,
            &api.health_path,
            &api.chat_path,
            reqwest::Client::new(),
        )
    }

    /// Create a backend with explicit paths and a custom reqwest client.
    ///
    /// Paths resolve against `base_url` the way a browser resolves them
    /// against the page origin.
    pub fn with_paths(
        base_url: impl AsRef<str>,
        health_path: &str,
        chat_path: &str,
        http: reqwest::Client,
    ) -> Result<Self> {
        let base = Url::parse(base_url.as_ref())?;
        Ok(Self {
            health_url: base.join(health_path)?,
            chat_url: base.join(chat_path)?,
            http,
        })
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn health(&self) -> Result<HealthReport> {
        let response = self.http.get(self.health_url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            name: "api.health.response",
            status = status.as_u16(),
            "Health endpoint responded"
        );
        let value: serde_json::Value = serde_json::from_str(&body)?;
        HealthReport::from_value(&value)
            .ok_or_else(|| WidgetError::InvalidResponse("health body is null".to_string()))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                name: "api.chat.rejected",
                status = status.as_u16(),
                "Chat endpoint returned an error status"
            );
            return Err(WidgetError::from_status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply: ChatReply = serde_json::from_str(&body)?;
        tracing::debug!(
            name: "api.chat.reply",
            model = reply.model.as_deref().unwrap_or("unknown"),
            chars = reply.response.len(),
            "Chat reply received"
        );
        Ok(reply)
    }
}
