//! Conversation, status and submission state.

use std::fmt;

use crate::dom::NodeId;

/// Kind of a rendered conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Bot,
    Error,
}

impl MessageKind {
    /// CSS class for the entry's bubble.
    pub fn class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::Error => "error",
        }
    }
}

/// One rendered entry in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    pub kind: MessageKind,
    pub text: String,
    /// The entry's `div.message` element.
    pub node: NodeId,
}

/// Backend availability as shown by the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    pub fn class(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Outcome of the last health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Not checked yet.
    Unknown,
    /// Reported `healthy`.
    Healthy,
    /// Answered, but not `healthy`.
    Degraded,
    /// No usable answer.
    Unreachable,
}

impl Health {
    pub fn status(self) -> Status {
        match self {
            Self::Healthy => Status::Online,
            Self::Unknown | Self::Degraded | Self::Unreachable => Status::Offline,
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Connecting...",
            Self::Healthy => "Online",
            Self::Degraded => "Degraded",
            Self::Unreachable => "Offline",
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Trimmed input was empty.
    EmptyInput,
    /// A message is already in flight.
    Busy,
    /// The event did not target the bound form.
    ForeignTarget,
}

/// Result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    /// A bot entry was appended.
    Replied,
    /// An error entry was appended.
    Failed,
}

/// A message accepted by `begin_submit` and awaiting its reply.
///
/// Must be handed back to `finish_submit`; dropping it leaves the widget
/// busy.
#[derive(Debug)]
#[must_use = "a pending message must be finished or the widget stays busy"]
pub struct PendingMessage {
    pub(super) text: String,
    pub(super) typing: NodeId,
}

impl PendingMessage {
    /// The trimmed text that was submitted.
    pub fn text(&self) -> &str {
        &self.text
    }
}
