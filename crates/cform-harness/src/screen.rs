#![forbid(unsafe_code)]

//! Accessibility-tree queries over a rendered frame.
//!
//! `get_*` panics unless exactly one node matches, `query_*` returns
//! `None` when nothing matches (and panics on several), and `get_all_*`
//! returns every match. Panic messages list the visible nodes so a failing
//! test shows what was on screen.

use std::fmt::Write as FmtWrite;

use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};

use crate::buffer_to_text;

/// How a query string is compared against node text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Equal after trimming surrounding whitespace.
    Exact(String),
    /// Case-insensitive substring.
    Contains(String),
}

impl TextMatch {
    pub fn exact(s: impl Into<String>) -> Self {
        Self::Exact(s.into())
    }

    pub fn contains(s: impl Into<String>) -> Self {
        Self::Contains(s.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(want) => candidate.trim() == want.trim(),
            Self::Contains(want) => candidate
                .to_lowercase()
                .contains(&want.to_lowercase()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(s: &str) -> Self {
        Self::Exact(s.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(s: String) -> Self {
        Self::Exact(s)
    }
}

/// Queries over one frame, optionally scoped to a region.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    frame: &'a Frame,
    region: Option<&'a str>,
}

impl<'a> Screen<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self {
            frame,
            region: None,
        }
    }

    /// Restrict queries to nodes registered inside `region`.
    pub fn within(self, region: &'a str) -> Self {
        Self {
            region: Some(region),
            ..self
        }
    }

    pub fn frame(&self) -> &'a Frame {
        self.frame
    }

    /// Rendered text of the whole frame.
    pub fn text(&self) -> String {
        buffer_to_text(&self.frame.buffer)
    }

    /// Nodes in scope, in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &'a SemanticNode> + use<'a> {
        let (frame, region) = (self.frame, self.region);
        frame
            .semantics
            .iter()
            .filter(move |n| region.is_none_or(|r| n.region.as_deref() == Some(r)))
    }

    pub fn focused(&self) -> Option<&'a SemanticNode> {
        self.nodes().find(|n| n.focused)
    }

    fn all_where(&self, pred: impl Fn(&SemanticNode) -> bool) -> Vec<&'a SemanticNode> {
        self.nodes().filter(|&n| pred(n)).collect()
    }

    fn single(&self, what: &str, found: Vec<&'a SemanticNode>) -> Option<&'a SemanticNode> {
        match found.as_slice() {
            [] => None,
            [one] => Some(*one),
            many => panic!(
                "found {} nodes {what}; expected at most one\n{}",
                many.len(),
                self.describe()
            ),
        }
    }

    fn expect_one(&self, what: &str, found: Vec<&'a SemanticNode>) -> &'a SemanticNode {
        match self.single(what, found) {
            Some(node) => node,
            None => panic!("no node {what}\n{}", self.describe()),
        }
    }

    // Placeholder

    pub fn get_all_by_placeholder(&self, m: impl Into<TextMatch>) -> Vec<&'a SemanticNode> {
        let m = m.into();
        self.all_where(|n| n.placeholder.as_deref().is_some_and(|p| m.matches(p)))
    }

    pub fn query_by_placeholder(&self, m: impl Into<TextMatch>) -> Option<&'a SemanticNode> {
        let m = m.into();
        let what = format!("with placeholder {m:?}");
        self.single(&what, self.get_all_by_placeholder(m))
    }

    pub fn get_by_placeholder(&self, m: impl Into<TextMatch>) -> &'a SemanticNode {
        let m = m.into();
        let what = format!("with placeholder {m:?}");
        self.expect_one(&what, self.get_all_by_placeholder(m))
    }

    // Label

    /// Editable nodes whose label matches.
    pub fn get_all_by_label(&self, m: impl Into<TextMatch>) -> Vec<&'a SemanticNode> {
        let m = m.into();
        self.all_where(|n| n.role.is_editable() && n.label.as_deref().is_some_and(|l| m.matches(l)))
    }

    pub fn query_by_label(&self, m: impl Into<TextMatch>) -> Option<&'a SemanticNode> {
        let m = m.into();
        let what = format!("labelled {m:?}");
        self.single(&what, self.get_all_by_label(m))
    }

    pub fn get_by_label(&self, m: impl Into<TextMatch>) -> &'a SemanticNode {
        let m = m.into();
        let what = format!("labelled {m:?}");
        self.expect_one(&what, self.get_all_by_label(m))
    }

    // Role

    pub fn get_all_by_role(&self, role: Role) -> Vec<&'a SemanticNode> {
        self.all_where(|n| n.role == role)
    }

    pub fn query_by_role(&self, role: Role) -> Option<&'a SemanticNode> {
        self.single(&format!("with role {role:?}"), self.get_all_by_role(role))
    }

    pub fn get_by_role(&self, role: Role) -> &'a SemanticNode {
        self.expect_one(&format!("with role {role:?}"), self.get_all_by_role(role))
    }

    // Visible text

    /// Nodes whose visible text matches. Input values do not count.
    pub fn get_all_by_text(&self, m: impl Into<TextMatch>) -> Vec<&'a SemanticNode> {
        let m = m.into();
        self.all_where(|n| !n.text.is_empty() && m.matches(&n.text))
    }

    pub fn query_by_text(&self, m: impl Into<TextMatch>) -> Option<&'a SemanticNode> {
        let m = m.into();
        let what = format!("with text {m:?}");
        self.single(&what, self.get_all_by_text(m))
    }

    pub fn get_by_text(&self, m: impl Into<TextMatch>) -> &'a SemanticNode {
        let m = m.into();
        let what = format!("with text {m:?}");
        self.expect_one(&what, self.get_all_by_text(m))
    }

    /// One line per node in scope, for failure messages.
    pub fn describe(&self) -> String {
        let mut out = String::from("nodes in scope:\n");
        for n in self.nodes() {
            let _ = write!(out, "  {:?} at ({}, {})", n.role, n.area.x, n.area.y);
            if let Some(label) = &n.label {
                let _ = write!(out, " label={label:?}");
            }
            if let Some(p) = &n.placeholder {
                let _ = write!(out, " placeholder={p:?}");
            }
            if let Some(v) = &n.value {
                let _ = write!(out, " value={v:?}");
            }
            if !n.text.is_empty() {
                let _ = write!(out, " text={:?}", n.text);
            }
            if let Some(r) = &n.region {
                let _ = write!(out, " region={r:?}");
            }
            out.push('\n');
        }
        out
    }
}
