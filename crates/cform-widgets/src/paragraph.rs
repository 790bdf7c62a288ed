#![forbid(unsafe_code)]

use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{Widget, draw_text_span, set_style_area};

/// Static text, optionally word-wrapped.
///
/// Registers a single node holding the full text, even when the visible
/// rows are clipped.
#[derive(Debug, Clone)]
pub struct Paragraph {
    text: String,
    role: Role,
    style: Style,
    wrap: bool,
    /// Lines skipped before the first drawn row.
    scroll: usize,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::Text,
            style: Style::default(),
            wrap: false,
            scroll: 0,
        }
    }

    /// A heading paragraph (bold by default).
    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(text).role(Role::Heading).style(Style::new().bold())
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Start drawing `lines` lines into the text.
    #[must_use]
    pub fn scroll(mut self, lines: usize) -> Self {
        self.scroll = lines;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rows needed to show the whole text at `width`.
    pub fn line_count(&self, width: u16) -> u16 {
        let n = if self.wrap {
            wrap_lines(&self.text, width as usize).len()
        } else {
            self.text.lines().count().max(1)
        };
        u16::try_from(n).unwrap_or(u16::MAX)
    }
}

impl Widget for Paragraph {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Paragraph",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        let area = area.intersection(&frame.bounds());
        if area.is_empty() {
            return;
        }
        set_style_area(&mut frame.buffer, area, self.style);

        let lines: Vec<String> = if self.wrap {
            wrap_lines(&self.text, area.width as usize)
        } else {
            self.text.lines().map(str::to_string).collect()
        };
        for (y, line) in (area.y..area.bottom()).zip(lines.iter().skip(self.scroll)) {
            draw_text_span(&mut frame.buffer, area.x, y, line, self.style, area.right());
        }

        frame.register(SemanticNode::new(self.role, area).text(&self.text));
    }
}

/// Greedy word wrap to `width` display columns.
///
/// Hard line breaks are kept. A word wider than `width` is split at
/// grapheme boundaries. Always returns at least one (possibly empty) line.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0usize;
        for word in raw.split_word_bounds() {
            let word_w = UnicodeWidthStr::width(word);
            if line_w + word_w <= width {
                line.push_str(word);
                line_w += word_w;
                continue;
            }
            if word.trim().is_empty() {
                // Break at whitespace instead of carrying it over.
                out.push(std::mem::take(&mut line).trim_end().to_string());
                line_w = 0;
                continue;
            }
            if line_w > 0 {
                out.push(std::mem::take(&mut line).trim_end().to_string());
                line_w = 0;
            }
            for g in word.graphemes(true) {
                let gw = UnicodeWidthStr::width(g);
                if line_w + gw > width && line_w > 0 {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push_str(g);
                line_w += gw;
            }
        }
        out.push(line.trim_end().to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_text() {
        let para = Paragraph::new("Hello");
        let mut frame = Frame::new(10, 1);
        para.render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "Hello     ");
        let node = &frame.semantics.nodes()[0];
        assert_eq!(node.role, Role::Text);
        assert_eq!(node.text, "Hello");
    }

    #[test]
    fn render_multiline_text() {
        let para = Paragraph::new("AB\nCD");
        let mut frame = Frame::new(3, 2);
        para.render(Rect::new(0, 0, 3, 2), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "AB ");
        assert_eq!(frame.buffer.row_text(1), "CD ");
    }

    #[test]
    fn heading_role_and_bold() {
        let para = Paragraph::heading("Contact Form");
        let mut frame = Frame::new(20, 1);
        para.render(Rect::new(0, 0, 20, 1), &mut frame);
        assert_eq!(frame.semantics.nodes()[0].role, Role::Heading);
        let attrs = frame.buffer.get(0, 0).map(|c| c.attrs);
        assert!(attrs.is_some_and(|a| a.contains(cform_render::cell::StyleFlags::BOLD)));
    }

    #[test]
    fn clipped_text_keeps_full_node_text() {
        let para = Paragraph::new("abcdefgh");
        let mut frame = Frame::new(4, 1);
        para.render(Rect::new(0, 0, 4, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "abcd");
        assert_eq!(frame.semantics.nodes()[0].text, "abcdefgh");
    }

    #[test]
    fn render_empty_area() {
        let para = Paragraph::new("x");
        let mut frame = Frame::new(4, 1);
        para.render(Rect::new(0, 0, 0, 0), &mut frame);
        assert!(frame.semantics.is_empty());
    }

    #[test]
    fn scroll_skips_leading_lines() {
        let para = Paragraph::new("one\ntwo\nthree").scroll(1);
        let mut frame = Frame::new(5, 2);
        para.render(Rect::new(0, 0, 5, 2), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "two  ");
        assert_eq!(frame.buffer.row_text(1), "three");
        assert_eq!(frame.semantics.nodes()[0].text, "one\ntwo\nthree");
    }

    #[test]
    fn tall_area_at_bottom_edge_is_clipped() {
        let text = "a\n".repeat(70_000);
        let para = Paragraph::new(text.as_str()).wrap(true);
        let mut frame = Frame::new(8, 24);
        let rows = para.line_count(8);
        assert_eq!(rows, u16::MAX);
        para.render(Rect::new(0, 20, 8, rows), &mut frame);
        assert_eq!(frame.buffer.row_text(23), "a       ");
        assert_eq!(frame.semantics.nodes()[0].area, Rect::new(0, 20, 8, 4));
    }

    #[test]
    fn wrap_at_word_boundaries() {
        assert_eq!(wrap_lines("hello world", 7), vec!["hello", "world"]);
        assert_eq!(wrap_lines("a b c", 3), vec!["a b", "c"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_lines("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn wrap_keeps_hard_breaks() {
        assert_eq!(wrap_lines("one\n\ntwo", 10), vec!["one", "", "two"]);
        assert_eq!(wrap_lines("", 10), vec![""]);
    }

    #[test]
    fn line_count_follows_wrapping() {
        let para = Paragraph::new("hello world").wrap(true);
        assert_eq!(para.line_count(7), 2);
        assert_eq!(para.line_count(20), 1);
        assert_eq!(Paragraph::new("").line_count(5), 1);
    }
}
