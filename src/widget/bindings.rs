//! Resolution of the host elements the widget drives.

use std::fmt;

use serde::Deserialize;

use crate::dom::{Document, NodeId};
use crate::error::{Result, WidgetError};

/// Class of the text node nested inside the status indicator.
pub const STATUS_TEXT_CLASS: &str = "status-text";

/// The role each bound element plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    MessageList,
    Form,
    Input,
    SendButton,
    Status,
    StatusText,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MessageList => "message list",
            Self::Form => "form",
            Self::Input => "input",
            Self::SendButton => "send button",
            Self::Status => "status",
            Self::StatusText => "status text",
        };
        f.write_str(name)
    }
}

/// Element ids the widget looks up in the host document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementIds {
    pub messages: String,
    pub form: String,
    pub input: String,
    pub send_button: String,
    pub status: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            messages: "messages".to_string(),
            form: "chat-form".to_string(),
            input: "message-input".to_string(),
            send_button: "send-button".to_string(),
            status: "status".to_string(),
        }
    }
}

/// Handles to every element the widget touches, validated present.
#[derive(Debug, Clone, Copy)]
pub struct Bindings {
    pub messages: NodeId,
    pub form: NodeId,
    pub input: NodeId,
    pub send_button: NodeId,
    pub status: NodeId,
    pub status_text: NodeId,
}

impl Bindings {
    /// Look up every element, failing on the first one that is absent.
    pub fn resolve(document: &Document, ids: &ElementIds) -> Result<Self> {
        let find = |role: ElementRole, id: &str| {
            document
                .element_by_id(id)
                .ok_or_else(|| WidgetError::MissingElement {
                    role,
                    id: id.to_string(),
                })
        };

        let status = find(ElementRole::Status, ids.status.as_str())?;
        let bindings = Self {
            messages: find(ElementRole::MessageList, ids.messages.as_str())?,
            form: find(ElementRole::Form, ids.form.as_str())?,
            input: find(ElementRole::Input, ids.input.as_str())?,
            send_button: find(ElementRole::SendButton, ids.send_button.as_str())?,
            status,
            status_text: document
                .query_class(status, STATUS_TEXT_CLASS)
                .ok_or_else(|| WidgetError::MissingElement {
                    role: ElementRole::StatusText,
                    id: format!("{} .{STATUS_TEXT_CLASS}", ids.status),
                })?,
        };
        Ok(bindings)
    }
}
