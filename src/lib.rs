//! Chat Widget
//!
//! A chat widget that binds to a host page, checks a chat backend's health,
//! and turns form submissions into chat requests, rendering the exchange as
//! message bubbles with a typing indicator while a reply is pending.
//!
//! # Architecture
//!
//! - **Document**: in-memory element tree the widget renders into
//! - **Backend**: `GET /api/health` and `POST /api/chat` behind a trait
//! - **Widget**: binding, event handling and the single in-flight gate
//!
//! # Modules
//!
//! - [`api`]: wire types, [`ChatBackend`] trait and the HTTP transport
//! - [`config`]: layered configuration
//! - [`dom`]: document model and typed events
//! - [`page`]: the host page that satisfies the element contract
//! - [`widget`]: the [`ChatWidget`] itself

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod page;
pub mod widget;

// Re-exports
pub use api::{ChatBackend, HttpBackend};
pub use error::{Result, WidgetError};
pub use widget::{ChatWidget, WidgetOptions};
