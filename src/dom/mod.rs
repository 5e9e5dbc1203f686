//! Minimal document model the widget renders into.
//!
//! This is the surface a host page exposes to the widget: a tree of
//! elements with ids, classes, text, form values, a disabled flag, keyboard
//! focus and a scroll position. It is deliberately small; only what the
//! widget reads or writes is modelled.
//!
//! - [`Document`]: the element arena
//! - [`Event`]: typed submit and key-down payloads

mod document;
mod events;

pub use document::{Document, NodeId};
pub use events::{Event, KEY_ENTER, KeyboardEvent, SubmitEvent};
