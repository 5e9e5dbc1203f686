//! The chat widget.
//!
//! [`ChatWidget`] owns a host [`Document`] and a [`ChatBackend`]. It binds
//! to five elements (message list, form, input, send button, status badge),
//! checks the backend's health once, and turns form submissions into one
//! request each, rendering the exchange as message bubbles.
//!
//! # Submission lifecycle
//!
//! ```text
//! Idle --submit--> Sending --reply--> Idle
//!                          \--error--> Idle
//! ```
//!
//! While sending, the input and send button are disabled and further
//! submits are ignored, so at most one message is ever in flight.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_widget::{ChatWidget, HttpBackend, WidgetOptions, page::host_page};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = WidgetOptions::default();
//! let document = host_page(&options.element_ids);
//! let backend = HttpBackend::new("http://localhost:8000")?;
//!
//! let mut widget = ChatWidget::init(document, backend, options).await?;
//! widget.set_input_value("Hello!");
//! widget.submit().await;
//! # Ok(())
//! # }
//! ```

mod bindings;
mod state;

use crate::api::{ChatBackend, ChatRequest, HealthReport};
use crate::config::{DEFAULT_FALLBACK_ERROR, DEFAULT_SYSTEM_PROMPT, WidgetConfig};
use crate::dom::{Document, Event, KeyboardEvent, NodeId, SubmitEvent};
use crate::error::Result;

pub use bindings::{Bindings, ElementIds, ElementRole, STATUS_TEXT_CLASS};
pub use state::{
    ConversationEntry, Health, IgnoreReason, MessageKind, PendingMessage, Status, SubmitOutcome,
};

/// Id given to the typing placeholder while a reply is awaited.
pub const TYPING_INDICATOR_ID: &str = "typing-indicator";

/// Construction-time settings for a widget.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub element_ids: ElementIds,
    pub system_prompt: String,
    pub fallback_error: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            element_ids: ElementIds::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }
}

impl From<&WidgetConfig> for WidgetOptions {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            element_ids: config.ui.element_ids.clone(),
            system_prompt: config.api.system_prompt.clone(),
            fallback_error: config.ui.fallback_error.clone(),
        }
    }
}

/// A chat widget bound to a host document.
#[derive(Debug)]
pub struct ChatWidget<B> {
    document: Document,
    backend: B,
    options: WidgetOptions,
    bindings: Bindings,
    entries: Vec<ConversationEntry>,
    health: Health,
    health_report: Option<HealthReport>,
    loading: bool,
}

impl<B: ChatBackend> ChatWidget<B> {
    /// Bind to the host document without contacting the backend.
    ///
    /// Fails with [`crate::WidgetError::MissingElement`] if any bound element is
    /// absent.
    pub fn new(document: Document, backend: B, options: WidgetOptions) -> Result<Self> {
        let bindings = Bindings::resolve(&document, &options.element_ids)?;
        Ok(Self {
            document,
            backend,
            options,
            bindings,
            entries: Vec::new(),
            health: Health::Unknown,
            health_report: None,
            loading: false,
        })
    }

    /// Bind to the host document and run the startup health check.
    pub async fn init(document: Document, backend: B, options: WidgetOptions) -> Result<Self> {
        let mut widget = Self::new(document, backend, options)?;
        widget.check_health().await;
        Ok(widget)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────

    /// Check the backend once and update the status badge.
    pub async fn check_health(&mut self) -> Health {
        let health = match self.backend.health().await {
            Ok(report) => {
                let health = if report.is_healthy() {
                    Health::Healthy
                } else {
                    Health::Degraded
                };
                tracing::info!(
                    name: "widget.health.checked",
                    status = report.status.as_deref().unwrap_or("-"),
                    database = report.database.as_deref().unwrap_or("-"),
                    ollama = report.ollama.as_deref().unwrap_or("-"),
                    "Backend health checked"
                );
                self.health_report = Some(report);
                health
            }
            Err(e) => {
                tracing::warn!(name: "widget.health.failed", error = %e, "Health check failed");
                self.health_report = None;
                Health::Unreachable
            }
        };
        self.set_status(health);
        health
    }

    fn set_status(&mut self, health: Health) {
        self.health = health;
        let class = format!("status {}", health.status().class());
        self.document.set_class_name(self.bindings.status, &class);
        self.document
            .set_text(self.bindings.status_text, health.label());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────

    /// Route an event to its handler by target.
    ///
    /// Returns `None` when the event did not lead to a submission attempt.
    pub async fn dispatch(&mut self, event: &mut Event) -> Option<SubmitOutcome> {
        match event {
            Event::Submit(submit) if submit.target() == self.bindings.form => {
                Some(self.handle_submit(submit).await)
            }
            Event::KeyDown(key) if key.target() == self.bindings.input => {
                self.handle_keydown(key).await
            }
            _ => None,
        }
    }

    /// Enter without Shift submits the form instead of inserting a newline.
    pub async fn handle_keydown(&mut self, event: &mut KeyboardEvent) -> Option<SubmitOutcome> {
        if !event.is_plain_enter() {
            return None;
        }
        event.prevent_default();
        Some(self.submit().await)
    }

    /// Submit the form as if the user pressed the send button.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let mut event = SubmitEvent::new(self.bindings.form);
        self.handle_submit(&mut event).await
    }

    /// Handle a form submission end to end.
    pub async fn handle_submit(&mut self, event: &mut SubmitEvent) -> SubmitOutcome {
        let pending = match self.begin_submit(event) {
            Ok(pending) => pending,
            Err(reason) => return SubmitOutcome::Ignored(reason),
        };
        let result = self.send_message(pending.text()).await;
        self.finish_submit(pending, result)
    }

    /// First half of a submission: everything up to the network call.
    ///
    /// Clears the input, appends the user entry, shows the typing
    /// indicator and disables the controls.
    pub fn begin_submit(
        &mut self,
        event: &mut SubmitEvent,
    ) -> std::result::Result<PendingMessage, IgnoreReason> {
        if event.target() != self.bindings.form {
            return Err(IgnoreReason::ForeignTarget);
        }
        event.prevent_default();

        let message = self.document.value(self.bindings.input).trim().to_string();
        if message.is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }
        if self.loading {
            tracing::debug!(name: "widget.submit.busy", "Submit ignored while sending");
            return Err(IgnoreReason::Busy);
        }

        self.document.set_value(self.bindings.input, "");
        self.add_message(MessageKind::User, &message);
        let typing = self.show_typing();
        self.set_loading(true);

        tracing::info!(
            name: "widget.submit.started",
            chars = message.len(),
            "Message submitted"
        );
        Ok(PendingMessage {
            text: message,
            typing,
        })
    }

    /// Second half of a submission: render the result and return to idle.
    pub fn finish_submit(
        &mut self,
        pending: PendingMessage,
        result: Result<String>,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(reply) => {
                self.add_message(MessageKind::Bot, &reply);
                SubmitOutcome::Replied
            }
            Err(e) => {
                tracing::warn!(name: "widget.submit.failed", error = %e, "Message failed");
                let text = e.user_message(&self.options.fallback_error);
                self.add_message(MessageKind::Error, &text);
                SubmitOutcome::Failed
            }
        };

        self.hide_typing(pending.typing);
        self.set_loading(false);
        self.document.focus(self.bindings.input);
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────
    // Backend
    // ─────────────────────────────────────────────────────────────────────

    /// Send one message and return the assistant's reply text.
    pub async fn send_message(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            message: text.to_string(),
            system_prompt: self.options.system_prompt.clone(),
        };
        let reply = self.backend.chat(&request).await?;
        tracing::info!(
            name: "widget.reply.received",
            model = reply.model.as_deref().unwrap_or("unknown"),
            "Reply received"
        );
        Ok(reply.response)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Append a message bubble and scroll it into view.
    pub fn add_message(&mut self, kind: MessageKind, text: &str) -> NodeId {
        let bubble = self.document.create_element("div");
        self.document
            .set_class_name(bubble, &format!("message {}", kind.class()));

        let content = self.document.create_element("div");
        self.document.set_class_name(content, "message-content");
        self.document.set_text(content, text);

        self.document.append_child(bubble, content);
        self.document.append_child(self.bindings.messages, bubble);
        self.document.scroll_to_bottom(self.bindings.messages);

        self.entries.push(ConversationEntry {
            kind,
            text: text.to_string(),
            node: bubble,
        });
        bubble
    }

    fn show_typing(&mut self) -> NodeId {
        let typing = self.document.create_element("div");
        self.document.set_class_name(typing, "typing-indicator");
        self.document.set_id(typing, TYPING_INDICATOR_ID);
        for _ in 0..3 {
            let dot = self.document.create_element("span");
            self.document.append_child(typing, dot);
        }
        self.document.append_child(self.bindings.messages, typing);
        self.document.scroll_to_bottom(self.bindings.messages);
        typing
    }

    fn hide_typing(&mut self, typing: NodeId) {
        self.document.remove(typing);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.document.set_disabled(self.bindings.input, loading);
        self.document.set_disabled(self.bindings.send_button, loading);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Type into the message input, replacing its contents.
    pub fn set_input_value(&mut self, text: &str) {
        self.document.set_value(self.bindings.input, text);
    }

    pub fn input_value(&self) -> &str {
        self.document.value(self.bindings.input)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Rendered entries, oldest first.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn status(&self) -> Status {
        self.health.status()
    }

    /// Text currently shown in the status badge.
    pub fn status_text(&self) -> String {
        self.document.text_content(self.bindings.status_text)
    }

    /// Body of the last successful health check.
    pub fn health_report(&self) -> Option<&HealthReport> {
        self.health_report.as_ref()
    }

    /// The typing placeholder, if one is shown.
    pub fn typing_indicator(&self) -> Option<NodeId> {
        self.document.element_by_id(TYPING_INDICATOR_ID)
    }
}

impl<B> From<ChatWidget<B>> for Document {
    fn from(widget: ChatWidget<B>) -> Self {
        widget.document
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::ChatReply;
    use crate::dom::KEY_ENTER;
    use crate::error::WidgetError;
    use crate::page::host_page;

    /// Backend that replays canned results and records requests.
    #[derive(Default)]
    struct ScriptedBackend {
        health: Mutex<VecDeque<Result<HealthReport>>>,
        replies: Mutex<VecDeque<Result<ChatReply>>>,
        requests: Mutex<Vec<ChatRequest>>,
        chat_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn with_health(self, result: Result<HealthReport>) -> Self {
            self.health.lock().unwrap().push_back(result);
            self
        }

        fn with_reply(self, result: Result<ChatReply>) -> Self {
            self.replies.lock().unwrap().push_back(result);
            self
        }

        fn calls(&self) -> usize {
            self.chat_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn health(&self) -> Result<HealthReport> {
            self.health
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(WidgetError::Network("no script".into())))
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
            self.chat_calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(WidgetError::Network("no script".into())))
        }
    }

    fn reply(text: &str) -> Result<ChatReply> {
        Ok(ChatReply {
            response: text.to_string(),
            model: Some("llama3.1:8b".to_string()),
        })
    }

    fn health(status: &str) -> Result<HealthReport> {
        Ok(HealthReport {
            status: Some(status.to_string()),
            ..HealthReport::default()
        })
    }

    fn widget(backend: ScriptedBackend) -> ChatWidget<ScriptedBackend> {
        let options = WidgetOptions::default();
        let document = host_page(&options.element_ids);
        ChatWidget::new(document, backend, options).unwrap()
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let mut w = widget(ScriptedBackend::default().with_reply(reply("Hi there!")));
        w.set_input_value("  Hello  ");

        let outcome = w.submit().await;

        assert_eq!(outcome, SubmitOutcome::Replied);
        let kinds: Vec<_> = w.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![MessageKind::User, MessageKind::Bot]);
        assert_eq!(w.entries()[0].text, "Hello");
        assert_eq!(w.entries()[1].text, "Hi there!");
        assert!(!w.is_loading());
        assert_eq!(w.input_value(), "");
        assert!(w.typing_indicator().is_none());
        assert_eq!(w.document().focused(), Some(w.bindings().input));

        let requests = w.backend().requests.lock().unwrap();
        assert_eq!(requests[0].message, "Hello");
        assert_eq!(requests[0].system_prompt, "You are a helpful assistant.");
    }

    #[tokio::test]
    async fn test_bubbles_are_rendered_in_order() {
        let mut w = widget(
            ScriptedBackend::default()
                .with_reply(reply("one"))
                .with_reply(reply("two")),
        );
        w.set_input_value("first");
        w.submit().await;
        w.set_input_value("second");
        w.submit().await;

        let doc = w.document();
        let list = w.bindings().messages;
        let texts: Vec<_> = doc
            .children(list)
            .iter()
            .map(|n| doc.text_content(*n))
            .collect();
        assert_eq!(texts, vec!["first", "one", "second", "two"]);
        assert!(doc.has_class(doc.children(list)[1], "bot"));
        assert_eq!(doc.scroll_top(list), 4);
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let mut w = widget(ScriptedBackend::default().with_reply(reply("unused")));
        w.set_input_value("   \n\t ");

        let outcome = w.submit().await;

        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoreReason::EmptyInput));
        assert!(w.entries().is_empty());
        assert_eq!(w.backend().calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_while_sending_is_noop() {
        let mut w = widget(ScriptedBackend::default().with_reply(reply("late")));
        w.set_input_value("first");
        let mut event = SubmitEvent::new(w.bindings().form);
        let pending = w.begin_submit(&mut event).unwrap();

        assert!(w.is_loading());
        assert!(w.document().is_disabled(w.bindings().input));
        assert!(w.document().is_disabled(w.bindings().send_button));
        assert!(w.typing_indicator().is_some());

        w.set_input_value("second");
        assert_eq!(w.submit().await, SubmitOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(w.entries().len(), 1);
        assert_eq!(w.backend().calls(), 0);

        let result = w.send_message(pending.text()).await;
        assert_eq!(w.finish_submit(pending, result), SubmitOutcome::Replied);
        assert!(!w.is_loading());
        assert!(w.typing_indicator().is_none());
        assert_eq!(w.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_error_statuses_become_error_entries() {
        let mut w = widget(
            ScriptedBackend::default()
                .with_reply(Err(WidgetError::from_status(401)))
                .with_reply(Err(WidgetError::from_status(504)))
                .with_reply(Err(WidgetError::from_status(500))),
        );

        for text in ["a", "b", "c"] {
            w.set_input_value(text);
            assert_eq!(w.submit().await, SubmitOutcome::Failed);
            assert!(w.typing_indicator().is_none());
            assert!(!w.is_loading());
        }

        let errors: Vec<_> = w
            .entries()
            .iter()
            .filter(|e| e.kind == MessageKind::Error)
            .map(|e| e.text.as_str())
            .collect();
        assert!(errors[0].contains("Authentication failed"));
        assert!(errors[1].contains("Request timed out"));
        assert_eq!(errors[2], "Server error: 500");
    }

    #[tokio::test]
    async fn test_error_without_message_uses_fallback() {
        let mut w = widget(ScriptedBackend::default().with_reply(Err(WidgetError::Network(
            String::new(),
        ))));
        w.set_input_value("hello");
        w.submit().await;

        assert_eq!(
            w.entries().last().unwrap().text,
            "Failed to get response. Please try again."
        );
    }

    #[tokio::test]
    async fn test_health_labels() {
        let mut w = widget(
            ScriptedBackend::default()
                .with_health(health("healthy"))
                .with_health(health("degraded")),
        );
        assert_eq!(w.health(), Health::Unknown);

        assert_eq!(w.check_health().await, Health::Healthy);
        assert_eq!(w.status_text(), "Online");
        assert_eq!(w.status(), Status::Online);
        assert_eq!(w.document().class_name(w.bindings().status), "status online");

        assert_eq!(w.check_health().await, Health::Degraded);
        assert_eq!(w.status_text(), "Degraded");
        assert_eq!(w.status(), Status::Offline);

        // Script exhausted: the backend now fails.
        assert_eq!(w.check_health().await, Health::Unreachable);
        assert_eq!(w.status_text(), "Offline");
        assert_eq!(w.document().class_name(w.bindings().status), "status offline");
        assert!(w.health_report().is_none());
    }

    #[tokio::test]
    async fn test_init_runs_health_check() {
        let options = WidgetOptions::default();
        let document = host_page(&options.element_ids);
        let backend = ScriptedBackend::default().with_health(health("healthy"));

        let w = ChatWidget::init(document, backend, options).await.unwrap();
        assert_eq!(w.status_text(), "Online");
    }

    #[tokio::test]
    async fn test_enter_submits_but_shift_enter_does_not() {
        let mut w = widget(ScriptedBackend::default().with_reply(reply("ok")));
        let input = w.bindings().input;
        w.set_input_value("line one");

        let mut shifted = Event::KeyDown(KeyboardEvent::new(input, KEY_ENTER).with_shift(true));
        assert_eq!(w.dispatch(&mut shifted).await, None);
        assert!(w.entries().is_empty());

        let mut letter = Event::KeyDown(KeyboardEvent::new(input, "a"));
        assert_eq!(w.dispatch(&mut letter).await, None);

        let mut enter = KeyboardEvent::new(input, KEY_ENTER);
        assert_eq!(
            w.handle_keydown(&mut enter).await,
            Some(SubmitOutcome::Replied)
        );
        assert!(enter.default_prevented());
        assert_eq!(w.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_ignores_foreign_targets() {
        let mut w = widget(ScriptedBackend::default());
        w.set_input_value("hello");

        let mut event = Event::Submit(SubmitEvent::new(w.bindings().input));
        assert_eq!(w.dispatch(&mut event).await, None);

        let mut submit = SubmitEvent::new(w.bindings().messages);
        assert_eq!(
            w.handle_submit(&mut submit).await,
            SubmitOutcome::Ignored(IgnoreReason::ForeignTarget)
        );
        assert!(!submit.default_prevented());
        assert_eq!(w.input_value(), "hello");
    }

    #[tokio::test]
    async fn test_form_submit_prevents_navigation() {
        let mut w = widget(ScriptedBackend::default().with_reply(reply("ok")));
        w.set_input_value("hi");
        let mut event = Event::Submit(SubmitEvent::new(w.bindings().form));

        assert_eq!(w.dispatch(&mut event).await, Some(SubmitOutcome::Replied));
        let Event::Submit(submit) = event else {
            unreachable!()
        };
        assert!(submit.default_prevented());
    }

    #[test]
    fn test_new_rejects_incomplete_document() {
        let result = ChatWidget::new(
            Document::new(),
            ScriptedBackend::default(),
            WidgetOptions::default(),
        );
        assert!(matches!(
            result,
            Err(WidgetError::MissingElement {
                role: ElementRole::Status,
                ..
            })
        ));
    }
}
