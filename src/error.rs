//! Error types for the widget.

use thiserror::Error;

use crate::widget::ElementRole;

/// Widget error type.
///
/// Everything except [`WidgetError::MissingElement`] is recoverable: the
/// widget renders it as an error entry and returns to idle.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// A required element is absent from the host document.
    #[error("missing {role} element: no element with id \"{id}\"")]
    MissingElement {
        /// Which binding failed.
        role: ElementRole,
        /// The id that was looked up.
        id: String,
    },

    /// The request never produced an HTTP response.
    #[error("{0}")]
    Network(String),

    /// HTTP 401 from the chat endpoint.
    #[error("Authentication failed. Please check credentials.")]
    AuthenticationFailed,

    /// HTTP 504 from the chat endpoint.
    #[error("Request timed out. Please try again.")]
    TimedOut,

    /// Any other non-2xx status.
    #[error("Server error: {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("{0}")]
    InvalidResponse(String),

    /// The configured endpoint URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl WidgetError {
    /// Map a non-success HTTP status to its error.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            504 => Self::TimedOut,
            status => Self::Server { status },
        }
    }

    /// Text shown to the user in place of a reply.
    ///
    /// Falls back to `fallback` when the error carries no message.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
