//! Chat backend wire types and transport.
//!
//! The widget talks to its backend through the [`ChatBackend`] trait so a
//! host (or a test) can supply any transport. [`HttpBackend`] is the
//! production implementation over `reqwest`.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

pub use http::HttpBackend;

/// Health status value that marks the backend as fully available.
pub const HEALTHY: &str = "healthy";

// =============================================================================
// Wire types
// =============================================================================

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// System prompt forwarded to the model.
    pub system_prompt: String,
}

/// Successful `POST /api/chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    /// Assistant text; empty when the backend omits it or sends `null`.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub response: String,
    /// Model that produced the reply, when the backend reports it.
    #[serde(default)]
    pub model: Option<String>,
}

fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `GET /api/health` body.
///
/// Fields that are absent or not strings read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthReport {
    /// Overall status; [`HEALTHY`] or anything else.
    pub status: Option<String>,
    /// Database component status.
    pub database: Option<String>,
    /// Model runtime component status.
    pub ollama: Option<String>,
}

impl HealthReport {
    /// Read a report out of any JSON body.
    ///
    /// Returns `None` only for `null`, which has no fields to read.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            status: field("status"),
            database: field("database"),
            ollama: field("ollama"),
        })
    }

    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some(HEALTHY)
    }
}

// =============================================================================
// Backend trait
// =============================================================================

/// Remote side of the widget.
///
/// Implementations must not retry or impose their own timeouts; a single
/// call maps to a single request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Check the backend once.
    ///
    /// Any JSON body other than `null` is `Ok`, regardless of HTTP status;
    /// transport and decode failures are `Err`.
    async fn health(&self) -> Result<HealthReport>;

    /// Send one chat message.
    ///
    /// Non-2xx statuses map through [`crate::WidgetError::from_status`].
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report_tolerates_extra_and_missing_fields() {
        let body = serde_json::json!({"status": "degraded", "database": "unhealthy", "uptime": 3});
        let report = HealthReport::from_value(&body).unwrap();
        assert!(!report.is_healthy());
        assert_eq!(report.database.as_deref(), Some("unhealthy"));
        assert!(report.ollama.is_none());
    }

    #[test]
    fn test_health_report_from_loose_bodies() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({"status": null}),
            serde_json::json!({"status": 1}),
            serde_json::json!([1, 2]),
        ] {
            let report = HealthReport::from_value(&body).unwrap();
            assert!(report.status.is_none(), "{body}");
            assert!(!report.is_healthy());
        }
        assert!(HealthReport::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_chat_reply_missing_or_null_response_is_empty() {
        let reply: ChatReply = serde_json::from_str(r#"{"model":"x"}"#).unwrap();
        assert_eq!(reply.response, "");
        let reply: ChatReply = serde_json::from_str(r#"{"response":null}"#).unwrap();
        assert_eq!(reply.response, "");
        assert!(serde_json::from_str::<ChatReply>("null").is_err());
    }

    #[test]
    fn test_chat_reply_parses_response() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"Hi","model":"llama3.1:8b"}"#).unwrap();
        assert_eq!(reply.response, "Hi");
        assert_eq!(reply.model.as_deref(), Some("llama3.1:8b"));
    }

    #[test]
    fn test_chat_request_shape() {
        let req = ChatRequest {
            message: "Hello".into(),
            system_prompt: "You are a helpful assistant.".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "message": "Hello",
                "system_prompt": "You are a helpful assistant."
            })
        );
    }
}
