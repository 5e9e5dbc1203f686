//! Arena-backed element tree.

use std::fmt::Write as _;

/// Handle to an element owned by a [`Document`].
///
/// Handles are only meaningful for the document that created them.
///
/// # Panics
///
/// Every [`Document`] method that takes a `NodeId` indexes its arena
/// directly and panics when given a handle from another document that is
/// out of range for this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    class_name: String,
    text: String,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll_top: usize,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            class_name: String::new(),
            text: String::new(),
            value: String::new(),
            disabled: false,
            parent: None,
            children: Vec::new(),
            scroll_top: 0,
        }
    }
}

/// An in-memory document: a tree of elements rooted at `<body>`.
///
/// Removed elements stay in the arena but are detached, so stale handles
/// never alias a different element. Lookups by id only see attached
/// elements, as in a browser.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
            body: NodeId(0),
            focused: None,
        }
    }

    /// The root element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tree structure
    // ─────────────────────────────────────────────────────────────────────

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    ///
    /// Returns `false` without changing anything if the move would create a
    /// cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if child == parent || self.is_ancestor(child, parent) {
            tracing::warn!(name: "dom.append.cycle", "refusing to append an ancestor");
            return false;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    /// Detach an element (and its subtree) from the document.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body {
            return;
        }
        if let Some(focused) = self.focused {
            if focused == node || self.is_ancestor(node, focused) {
                self.focused = None;
            }
        }
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.0].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes[p.0].parent;
        }
        false
    }

    /// Whether the element is reachable from `<body>`.
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.body || self.is_ancestor(self.body, node)
    }

    /// Direct children, in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Depth-first, document order, excluding `scope` itself.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────

    /// Find the first attached element with the given id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
    }

    /// Find the first descendant of `scope` carrying `class`.
    pub fn query_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.has_class(*n, class))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0].id = Some(id.to_string());
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].id.as_deref()
    }

    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        self.nodes[node.0].class_name = class_name.to_string();
    }

    pub fn class_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].class_name
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0]
            .class_name
            .split_whitespace()
            .any(|c| c == class)
    }

    /// Replace the element's content with a single run of text.
    ///
    /// Existing children are detached, matching `textContent` assignment.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].text = text.to_string();
    }

    /// Text of the element and all of its descendants, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.nodes[node.0].text.clone();
        for child in &self.nodes[node.0].children {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    /// Current value of a form control.
    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes[node.0].disabled
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.nodes[node.0].disabled = disabled;
        if disabled && self.focused == Some(node) {
            self.focused = None;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus and scrolling
    // ─────────────────────────────────────────────────────────────────────

    /// Move keyboard focus to `node`.
    ///
    /// Disabled or detached elements cannot take focus; the call is ignored.
    pub fn focus(&mut self, node: NodeId) {
        if self.is_disabled(node) || !self.is_attached(node) {
            return;
        }
        self.focused = Some(node);
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Scrollable height in rows: one per child.
    pub fn scroll_height(&self, node: NodeId) -> usize {
        self.nodes[node.0].children.len()
    }

    /// Current scroll offset, clamped to the content that remains.
    pub fn scroll_top(&self, node: NodeId) -> usize {
        self.nodes[node.0].scroll_top.min(self.scroll_height(node))
    }

    pub fn scroll_to_bottom(&mut self, node: NodeId) {
        self.nodes[node.0].scroll_top = self.scroll_height(node);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────

    /// Serialize the attached tree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.body, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let el = &self.nodes[node.0];
        let _ = write!(out, "<{}", el.tag);
        if let Some(id) = &el.id {
            let _ = write!(out, " id=\"{}\"", escape(id));
        }
        if !el.class_name.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&el.class_name));
        }
        if !el.value.is_empty() {
            let _ = write!(out, " value=\"{}\"", escape(&el.value));
        }
        if el.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        if VOID_TAGS.contains(&el.tag.as_str()) {
            return;
        }
        out.push_str(&escape(&el.text));
        for child in &el.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
