#![forbid(unsafe_code)]

//! Text input widget.
//!
//! A single-line text input with a grapheme-indexed cursor, horizontal
//! scrolling, and a placeholder shown while the value is empty. The widget
//! registers a [`Role::TextBox`] node carrying its label, placeholder, and
//! current value.

use cform_core::event::{Event, KeyCode, KeyEvent};
use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::cell::{Cell, PackedRgba, StyleFlags};
use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{Widget, grapheme_byte_offset, grapheme_count, grapheme_display_width};

/// A single-line text input widget.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
    placeholder: String,
    /// Accessible name.
    label: String,
    focused: bool,
    style: Style,
    placeholder_style: Style,
    cursor_style: Style,
}

impl Default for TextInput {
    fn default() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: String::new(),
            label: String::new(),
            focused: false,
            style: Style::new().attrs(StyleFlags::UNDERLINE),
            placeholder_style: Style::new().fg(PackedRgba::GRAY).dim(),
            cursor_style: Style::new().reverse(),
        }
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Builder methods ---

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = grapheme_count(&self.value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    // --- Access ---

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value, clamping the cursor to the new length.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(grapheme_count(&self.value));
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    // --- Editing ---

    /// Handle an input event. Returns `true` if the event was consumed.
    ///
    /// `Enter`, `Tab`, and `Escape` are left for the owner to interpret.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_actionable() => self.handle_key(key),
            Event::Paste(text) => {
                // Single-line: newlines in pasted text become spaces.
                let flattened: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.insert_str(&flattened);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.ctrl() => {
                self.clear();
                true
            }
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.delete_char_back();
                true
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(grapheme_count(&self.value));
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = grapheme_count(&self.value);
                true
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    // Cursor advances by the grapheme delta so combining marks merge.
    fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let before = grapheme_count(&self.value);
        let offset = grapheme_byte_offset(&self.value, self.cursor);
        self.value.insert_str(offset, text);
        let after = grapheme_count(&self.value);
        self.cursor = (self.cursor + after.saturating_sub(before)).min(after);
    }

    fn delete_char_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = grapheme_byte_offset(&self.value, self.cursor - 1);
        let end = grapheme_byte_offset(&self.value, self.cursor);
        self.value.drain(start..end);
        self.cursor -= 1;
    }

    fn delete_char_forward(&mut self) {
        if self.cursor >= grapheme_count(&self.value) {
            return;
        }
        let start = grapheme_byte_offset(&self.value, self.cursor);
        let end = grapheme_byte_offset(&self.value, self.cursor + 1);
        self.value.drain(start..end);
    }

    /// Horizontal scroll (in cells) that keeps the cursor inside the viewport.
    fn scroll_for(&self, viewport_width: usize) -> usize {
        if viewport_width == 0 {
            return 0;
        }
        let cursor_x = grapheme_display_width(&self.value, self.cursor);
        // Reserve one cell after the text for the cursor.
        (cursor_x + 1).saturating_sub(viewport_width)
    }

    /// Screen position of the cursor within `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let cursor_x = grapheme_display_width(&self.value, self.cursor);
        let rel = cursor_x.saturating_sub(self.scroll_for(area.width as usize));
        let x = area
            .x
            .saturating_add(rel.min(area.width.saturating_sub(1) as usize) as u16);
        (x, area.y)
    }
}

impl Widget for TextInput {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextInput",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let row = area.row(0);
        crate::set_style_area(&mut frame.buffer, row, self.style);

        if self.value.is_empty() {
            crate::draw_text_span(
                &mut frame.buffer,
                row.x,
                row.y,
                &self.placeholder,
                self.placeholder_style,
                row.right(),
            );
        } else {
            let scroll = self.scroll_for(row.width as usize);
            let mut visual_x = 0usize;
            for g in self.value.graphemes(true) {
                let w = UnicodeWidthStr::width(g);
                if visual_x < scroll {
                    visual_x += w;
                    continue;
                }
                let rel = visual_x - scroll;
                if rel + w > row.width as usize {
                    break;
                }
                if let Some(c) = g.chars().next() {
                    let mut cell = Cell::from_char(c);
                    self.style.apply_to(&mut cell);
                    frame.buffer.set(row.x + rel as u16, row.y, cell);
                }
                visual_x += w;
            }
        }

        if self.focused {
            let (cx, cy) = self.cursor_position(row);
            if let Some(cell) = frame.buffer.get_mut(cx, cy) {
                self.cursor_style.apply_to(cell);
            }
            frame.set_cursor(Some((cx, cy)));
        }

        frame.register(
            SemanticNode::new(Role::TextBox, row)
                .label(&self.label)
                .placeholder(&self.placeholder)
                .value(&self.value)
                .focused(self.focused),
        );
    }
}
