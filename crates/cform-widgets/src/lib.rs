#![forbid(unsafe_code)]

//! Widgets for the contact form.
//!
//! Every widget draws into the frame's cell buffer and registers one
//! accessibility node describing itself, so what a user sees and what an
//! assistive query finds never drift apart.

pub mod button;
pub mod input;
pub mod paragraph;
pub mod textarea;
pub mod validation_error;

pub use button::Button;
pub use input::TextInput;
pub use paragraph::Paragraph;
pub use textarea::TextArea;
pub use validation_error::ValidationErrorDisplay;

use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::buffer::Buffer;
use cform_render::cell::Cell;
use cform_render::frame::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Apply a style to all cells in a rectangular area, preserving content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                style.apply_to(cell);
            }
        }
    }
}

/// Draw a text span into a buffer at the given position.
///
/// Returns the x position after the last drawn grapheme. Stops before
/// `max_x` (exclusive); a grapheme that would cross it is not drawn.
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            style.apply_to(&mut cell);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}

/// Number of extended grapheme clusters in `s`.
pub(crate) fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset of the grapheme at `idx` (or `s.len()` past the end).
pub(crate) fn grapheme_byte_offset(s: &str, idx: usize) -> usize {
    s.grapheme_indices(true)
        .nth(idx)
        .map_or(s.len(), |(offset, _)| offset)
}

/// Display width of the first `idx` graphemes of `s`.
pub(crate) fn grapheme_display_width(s: &str, idx: usize) -> usize {
    s.graphemes(true).take(idx).map(UnicodeWidthStr::width).sum()
}
