#![forbid(unsafe_code)]

//! Inline validation error display.
//!
//! Draws `icon message` on a single row directly below the offending field.
//! Narrow areas truncate the message with an ellipsis; the registered
//! [`Role::Alert`] node always carries the full message so it is announced
//! (and queryable) verbatim.
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | Empty message | Renders icon only |
//! | Zero-width area | No-op |
//! | Very narrow area | Truncates message with ellipsis |

use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::cell::PackedRgba;
use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{Widget, draw_text_span};

/// Default error foreground color (red).
pub const ERROR_FG_DEFAULT: PackedRgba = PackedRgba::rgb(220, 60, 60);

/// Default error icon.
pub const ERROR_ICON_DEFAULT: &str = "⚠";

#[derive(Debug, Clone)]
pub struct ValidationErrorDisplay {
    message: String,
    icon: String,
    style: Style,
    icon_style: Style,
}

impl Default for ValidationErrorDisplay {
    fn default() -> Self {
        Self {
            message: String::new(),
            icon: ERROR_ICON_DEFAULT.to_string(),
            style: Style::new().fg(ERROR_FG_DEFAULT),
            icon_style: Style::new().fg(ERROR_FG_DEFAULT).bold(),
        }
    }
}

impl ValidationErrorDisplay {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set a custom icon (default: "⚠").
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Width needed to show icon and message untruncated.
    pub fn min_width(&self) -> u16 {
        let icon_width = self.icon.width() as u16;
        if self.message.is_empty() {
            icon_width
        } else {
            icon_width
                .saturating_add(1)
                .saturating_add(self.message.width() as u16)
        }
    }
}

impl Widget for ValidationErrorDisplay {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "ValidationErrorDisplay",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        let y = area.y;
        let max_x = area.right();
        let mut x = draw_text_span(&mut frame.buffer, area.x, y, &self.icon, self.icon_style, max_x);

        if x < max_x && !self.message.is_empty() {
            x = x.saturating_add(1);
            let remaining = max_x.saturating_sub(x) as usize;
            if self.message.width() <= remaining {
                draw_text_span(&mut frame.buffer, x, y, &self.message, self.style, max_x);
            } else if remaining >= 1 {
                let mut truncated = String::new();
                let mut w = 0;
                for g in self.message.graphemes(true) {
                    let gw = g.width();
                    if w + gw > remaining - 1 {
                        break;
                    }
                    truncated.push_str(g);
                    w += gw;
                }
                truncated.push('…');
                draw_text_span(&mut frame.buffer, x, y, &truncated, self.style, max_x);
            }
        }

        frame.register(SemanticNode::new(Role::Alert, area.row(0)).text(&self.message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MSG: &str = "Error: lastName is a required field.";

    #[test]
    fn renders_icon_then_message() {
        let error = ValidationErrorDisplay::new("Bad");
        let mut frame = Frame::new(10, 1);
        error.render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "⚠ Bad     ");
        assert_eq!(frame.buffer.get(2, 0).map(|c| c.fg), Some(ERROR_FG_DEFAULT));
    }

    #[test]
    fn registers_alert_with_message_only() {
        let error = ValidationErrorDisplay::new(MSG);
        let mut frame = Frame::new(60, 2);
        error.render(Rect::new(0, 1, 60, 1), &mut frame);
        let node = &frame.semantics.nodes()[0];
        assert_eq!(node.role, Role::Alert);
        assert_eq!(node.text, MSG);
        assert_eq!(node.area, Rect::new(0, 1, 60, 1));
    }

    #[test]
    fn narrow_area_truncates_with_ellipsis() {
        let error = ValidationErrorDisplay::new(MSG);
        let mut frame = Frame::new(10, 1);
        error.render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "⚠ Error: …");
        assert_eq!(frame.semantics.nodes()[0].text, MSG);
    }

    #[test]
    fn empty_message_renders_icon_only() {
        let error = ValidationErrorDisplay::new("").with_icon("!");
        let mut frame = Frame::new(4, 1);
        error.render(Rect::new(0, 0, 4, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "!   ");
        assert_eq!(error.min_width(), 1);
    }

    #[test]
    fn zero_area_is_noop() {
        let error = ValidationErrorDisplay::new(MSG);
        let mut frame = Frame::new(4, 1);
        error.render(Rect::new(0, 0, 0, 1), &mut frame);
        assert!(frame.semantics.is_empty());
    }

    #[test]
    fn min_width_counts_icon_gap_and_message() {
        assert_eq!(ValidationErrorDisplay::new("abc").min_width(), 5);
    }
}
