#![forbid(unsafe_code)]

//! Multi-line text area.
//!
//! Lines are stored separately; the cursor is a `(row, grapheme column)`
//! pair. `Enter` inserts a line break, arrows move across line boundaries,
//! and the viewport scrolls vertically to keep the cursor row visible.

use cform_core::event::{Event, KeyCode, KeyEvent};
use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::cell::StyleFlags;
use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};

use crate::{Widget, grapheme_byte_offset, grapheme_count, grapheme_display_width};

#[derive(Debug, Clone)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
    label: String,
    placeholder: String,
    focused: bool,
    style: Style,
    cursor_style: Style,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            label: String::new(),
            placeholder: String::new(),
            focused: false,
            style: Style::new().attrs(StyleFlags::UNDERLINE),
            cursor_style: Style::new().reverse(),
        }
    }
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Full text, lines joined with `\n`.
    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Replace the text and move the cursor to its end.
    pub fn set_value(&mut self, value: &str) {
        self.lines = value
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();
        self.row = self.lines.len() - 1;
        self.col = grapheme_count(&self.lines[self.row]);
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.row = 0;
        self.col = 0;
    }

    /// Cursor as `(row, grapheme column)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
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

    /// Handle an input event. Returns `true` if the event was consumed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_actionable() => self.handle_key(key),
            Event::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        self.insert_newline();
                    }
                    self.insert_str(part);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Backspace => {
                self.delete_back();
                true
            }
            KeyCode::Delete => {
                self.delete_forward();
                true
            }
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
                true
            }
            KeyCode::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                true
            }
            KeyCode::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
                true
            }
            KeyCode::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
                true
            }
            KeyCode::Home => {
                self.col = 0;
                true
            }
            KeyCode::End => {
                self.col = self.line_len(self.row);
                true
            }
            _ => false,
        }
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| grapheme_count(l))
    }

    fn insert_str(&mut self, text: &str) {
        let line = &mut self.lines[self.row];
        let before = grapheme_count(line);
        let offset = grapheme_byte_offset(line, self.col);
        line.insert_str(offset, text);
        let after = grapheme_count(line);
        self.col = (self.col + after.saturating_sub(before)).min(after);
    }

    fn insert_newline(&mut self) {
        let line = &mut self.lines[self.row];
        let offset = grapheme_byte_offset(line, self.col);
        let tail = line.split_off(offset);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    fn delete_back(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let start = grapheme_byte_offset(line, self.col - 1);
            let end = grapheme_byte_offset(line, self.col);
            line.drain(start..end);
            self.col -= 1;
        } else if self.row > 0 {
            let tail = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&tail);
        }
    }

    fn delete_forward(&mut self) {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let start = grapheme_byte_offset(line, self.col);
            let end = grapheme_byte_offset(line, self.col + 1);
            line.drain(start..end);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    /// First visible line for a viewport of `height` rows.
    fn scroll_for(&self, height: usize) -> usize {
        (self.row + 1).saturating_sub(height.max(1))
    }
}

impl Widget for TextArea {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextArea",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        crate::set_style_area(&mut frame.buffer, area, self.style);

        if self.is_empty() && !self.placeholder.is_empty() {
            crate::draw_text_span(
                &mut frame.buffer,
                area.x,
                area.y,
                &self.placeholder,
                Style::new().dim(),
                area.right(),
            );
        }

        let scroll = self.scroll_for(area.height as usize);
        for (i, line) in self
            .lines
            .iter()
            .enumerate()
            .skip(scroll)
            .take(area.height as usize)
        {
            let y = area.y + (i - scroll) as u16;
            crate::draw_text_span(&mut frame.buffer, area.x, y, line, self.style, area.right());
        }

        if self.focused {
            let cursor_x = grapheme_display_width(&self.lines[self.row], self.col)
                .min(area.width.saturating_sub(1) as usize);
            let x = area.x + cursor_x as u16;
            let y = area.y + (self.row - scroll) as u16;
            if let Some(cell) = frame.buffer.get_mut(x, y) {
                self.cursor_style.apply_to(cell);
            }
            frame.set_cursor(Some((x, y)));
        }

        let mut node = SemanticNode::new(Role::TextArea, area)
            .label(&self.label)
            .value(self.value())
            .focused(self.focused);
        if !self.placeholder.is_empty() {
            node = node.placeholder(&self.placeholder);
        }
        frame.register(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(area: &mut TextArea, s: &str) {
        for c in s.chars() {
            let event = if c == '\n' {
                Event::key(KeyCode::Enter)
            } else {
                Event::char(c)
            };
            area.handle_event(&event);
        }
    }

    #[test]
    fn enter_splits_lines() {
        let mut area = TextArea::new();
        type_str(&mut area, "hello\nworld");
        assert_eq!(area.value(), "hello\nworld");
        assert_eq!(area.cursor(), (1, 5));
    }

    #[test]
    fn enter_mid_line_moves_tail() {
        let mut area = TextArea::new().with_value("helloworld");
        for _ in 0..5 {
            area.handle_event(&Event::key(KeyCode::Left));
        }
        area.handle_event(&Event::key(KeyCode::Enter));
        assert_eq!(area.value(), "hello\nworld");
        assert_eq!(area.cursor(), (1, 0));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut area = TextArea::new().with_value("ab\ncd");
        area.handle_event(&Event::key(KeyCode::Home));
        area.handle_event(&Event::key(KeyCode::Backspace));
        assert_eq!(area.value(), "abcd");
        assert_eq!(area.cursor(), (0, 2));
    }

    #[test]
    fn delete_at_line_end_joins_next() {
        let mut area = TextArea::new().with_value("ab\ncd");
        area.handle_event(&Event::key(KeyCode::Up));
        area.handle_event(&Event::key(KeyCode::End));
        area.handle_event(&Event::key(KeyCode::Delete));
        assert_eq!(area.value(), "abcd");
    }

    #[test]
    fn arrows_cross_line_boundaries() {
        let mut area = TextArea::new().with_value("ab\ncd");
        area.handle_event(&Event::key(KeyCode::Home));
        area.handle_event(&Event::key(KeyCode::Left));
        assert_eq!(area.cursor(), (0, 2));
        area.handle_event(&Event::key(KeyCode::Right));
        assert_eq!(area.cursor(), (1, 0));
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut area = TextArea::new().with_value("a\nlonger");
        area.handle_event(&Event::key(KeyCode::Up));
        assert_eq!(area.cursor(), (0, 1));
        area.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(area.cursor(), (1, 1));
    }

    #[test]
    fn paste_keeps_line_breaks() {
        let mut area = TextArea::new();
        area.handle_event(&Event::Paste("one\r\ntwo".into()));
        assert_eq!(area.value(), "one\ntwo");
    }

    #[test]
    fn paste_with_bare_carriage_returns() {
        let mut area = TextArea::new();
        area.handle_event(&Event::Paste("one\rtwo\r\rthree\r\n".into()));
        assert_eq!(area.value(), "one\ntwo\n\nthree\n");
        assert!(!area.value().contains('\r'));
        assert_eq!(area.cursor(), (4, 0));
    }

    #[test]
    fn clear_resets() {
        let mut area = TextArea::new().with_value("x\ny");
        area.clear();
        assert!(area.is_empty());
        assert_eq!(area.cursor(), (0, 0));
    }

    #[test]
    fn render_registers_text_area_node() {
        let area = TextArea::new().with_label("Message").with_value("hi");
        let mut frame = Frame::new(8, 3);
        area.render(Rect::new(0, 0, 8, 3), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "hi      ");
        let node = &frame.semantics.nodes()[0];
        assert_eq!(node.role, Role::TextArea);
        assert_eq!(node.label.as_deref(), Some("Message"));
        assert_eq!(node.value.as_deref(), Some("hi"));
        assert_eq!(node.placeholder, None);
    }

    #[test]
    fn render_scrolls_to_cursor_row() {
        let area = TextArea::new()
            .with_value("1\n2\n3\n4")
            .with_focused(true);
        let mut frame = Frame::new(4, 2);
        area.render(Rect::new(0, 0, 4, 2), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "3   ");
        assert_eq!(frame.buffer.row_text(1), "4   ");
        assert_eq!(frame.cursor_position, Some((1, 1)));
    }
}
