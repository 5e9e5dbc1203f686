//! Host page satisfying the widget's element contract.

use crate::dom::{Document, NodeId};
use crate::widget::{ElementIds, Health, STATUS_TEXT_CLASS};

/// Build the chat page: header with status badge, message list, and the
/// input form.
///
/// ```text
/// body
/// └─ div.chat-container
///    ├─ header.chat-header
///    │  ├─ h1 "Chat"
///    │  └─ div#status.status.offline
///    │     ├─ span.status-dot
///    │     └─ span.status-text "Connecting..."
///    ├─ div#messages.messages
///    └─ form#chat-form.chat-form
///       ├─ input#message-input
///       └─ button#send-button "Send"
/// ```
pub fn host_page(ids: &ElementIds) -> Document {
    let mut doc = Document::new();
    let body = doc.body();

    let container = element(&mut doc, body, "div", "chat-container");

    let header = element(&mut doc, container, "header", "chat-header");
    let title = element(&mut doc, header, "h1", "");
    doc.set_text(title, "Chat");

    let status = element(&mut doc, header, "div", "status offline");
    doc.set_id(status, &ids.status);
    element(&mut doc, status, "span", "status-dot");
    let status_text = element(&mut doc, status, "span", STATUS_TEXT_CLASS);
    doc.set_text(status_text, Health::Unknown.label());

    let messages = element(&mut doc, container, "div", "messages");
    doc.set_id(messages, &ids.messages);

    let form = element(&mut doc, container, "form", "chat-form");
    doc.set_id(form, &ids.form);
    let input = element(&mut doc, form, "input", "message-input");
    doc.set_id(input, &ids.input);
    let send = element(&mut doc, form, "button", "send-button");
    doc.set_id(send, &ids.send_button);
    doc.set_text(send, "Send");

    doc
}

fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
    let node = doc.create_element(tag);
    if !class.is_empty() {
        doc.set_class_name(node, class);
    }
    doc.append_child(parent, node);
    node
}
