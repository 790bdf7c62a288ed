#![forbid(unsafe_code)]

//! Accessibility tree.
//!
//! Widgets describe themselves while rendering: each registers a
//! [`SemanticNode`] naming its [`Role`], accessible label, placeholder,
//! current value, visible text, and the cells it occupies. Screen readers
//! and tests query this tree instead of scraping the cell grid.
//!
//! Nodes registered between [`SemanticTree::enter_region`] and
//! [`SemanticTree::exit_region`] remember the innermost region name, so a
//! query can be scoped to e.g. the submission summary.

use cform_core::geometry::Rect;

/// What a node is, in accessibility terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Heading,
    /// Single-line text input.
    TextBox,
    /// Multi-line text input.
    TextArea,
    Button,
    /// A live message announced on appearance (validation errors).
    Alert,
    /// A named group of nodes.
    Region,
    /// Static text.
    Text,
}

impl Role {
    /// Roles that accept typed text.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::TextBox | Self::TextArea)
    }
}

/// One entry in the accessibility tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticNode {
    pub role: Role,
    /// Accessible name given by an associated label.
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// Current value of an editable node.
    pub value: Option<String>,
    /// Visible text content.
    pub text: String,
    /// Cells occupied by the node.
    pub area: Rect,
    pub focused: bool,
    /// Innermost enclosing region, if any.
    pub region: Option<String>,
}

impl SemanticNode {
    #[must_use]
    pub fn new(role: Role, area: Rect) -> Self {
        Self {
            role,
            label: None,
            placeholder: None,
            value: None,
            text: String::new(),
            area,
            focused: false,
            region: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Label if present, otherwise the visible text.
    pub fn accessible_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.text)
    }
}

/// Nodes registered during one render pass, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticTree {
    nodes: Vec<SemanticNode>,
    regions: Vec<String>,
}

impl SemanticTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, tagging it with the current region.
    pub fn push(&mut self, mut node: SemanticNode) {
        if node.region.is_none() {
            node.region = self.regions.last().cloned();
        }
        self.nodes.push(node);
    }

    pub fn enter_region(&mut self, name: impl Into<String>) {
        self.regions.push(name.into());
    }

    pub fn exit_region(&mut self) {
        self.regions.pop();
    }

    pub fn nodes(&self) -> &[SemanticNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node holding focus, if any.
    pub fn focused(&self) -> Option<&SemanticNode> {
        self.nodes.iter().find(|n| n.focused)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.regions.clear();
    }
}
