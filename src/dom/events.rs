//! Typed event payloads delivered to the widget.

use super::NodeId;

/// Key name reported for the Enter key.
pub const KEY_ENTER: &str = "Enter";

/// A form submission.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    target: NodeId,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Suppress page navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A key-down on a focusable element.
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    target: NodeId,
    key: String,
    shift_key: bool,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub fn new(target: NodeId, key: impl Into<String>) -> Self {
        Self {
            target,
            key: key.into(),
            shift_key: false,
            default_prevented: false,
        }
    }

    #[must_use]
    pub fn with_shift(mut self, shift_key: bool) -> Self {
        self.shift_key = shift_key;
        self
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shift_key(&self) -> bool {
        self.shift_key
    }

    /// Suppress the default action (newline insertion for Enter).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Enter without Shift.
    pub fn is_plain_enter(&self) -> bool {
        self.key == KEY_ENTER && !self.shift_key
    }
}

/// Events a host forwards to the widget.
#[derive(Debug, Clone)]
pub enum Event {
    Submit(SubmitEvent),
    KeyDown(KeyboardEvent),
}

impl Event {
    pub fn target(&self) -> NodeId {
        match self {
            Self::Submit(e) => e.target(),
            Self::KeyDown(e) => e.target(),
        }
    }
}
