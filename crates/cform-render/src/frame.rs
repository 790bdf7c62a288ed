#![forbid(unsafe_code)]

//! Render target handed to `Model::view`.
//!
//! A [`Frame`] bundles the cell [`Buffer`], the cursor request, and the
//! [`SemanticTree`] widgets register themselves in. It is rebuilt from
//! scratch for every render pass.

use crate::buffer::Buffer;
use crate::semantics::{SemanticNode, SemanticTree};
use cform_core::geometry::Rect;

#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    /// Hardware cursor position requested by the focused widget.
    pub cursor_position: Option<(u16, u16)>,
    pub semantics: SemanticTree,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            cursor_position: None,
            semantics: SemanticTree::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Request the terminal cursor at a position (ignored if off-frame).
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position.filter(|&(x, y)| self.bounds().contains(x, y));
    }

    /// Register an accessibility node, clipped to the frame.
    ///
    /// Nodes with no visible cells are dropped.
    pub fn register(&mut self, mut node: SemanticNode) {
        node.area = node.area.intersection(&self.bounds());
        if node.area.is_empty() {
            return;
        }
        self.semantics.push(node);
    }

    /// Render `f` with every node it registers scoped to a named region.
    pub fn region<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.semantics.enter_region(name);
        let out = f(self);
        self.semantics.exit_region();
        out
    }

    /// Clear cells, cursor, and semantics for reuse.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = None;
        self.semantics.clear();
    }
}
