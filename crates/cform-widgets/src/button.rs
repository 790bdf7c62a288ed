#![forbid(unsafe_code)]

use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::frame::Frame;
use cform_render::semantics::{Role, SemanticNode};
use unicode_width::UnicodeWidthStr;

use crate::{Widget, draw_text_span};

/// A push button drawn as `[ label ]`.
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    focused: bool,
    style: Style,
    focused_style: Style,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focused: false,
            style: Style::new().bold(),
            focused_style: Style::new().bold().reverse(),
        }
    }

    #[must_use]
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width of the drawn button including brackets.
    pub fn width(&self) -> u16 {
        u16::try_from(self.label.width() + 4).unwrap_or(u16::MAX)
    }
}

impl Widget for Button {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Button",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let style = if self.focused {
            self.focused_style
        } else {
            self.style
        };
        let drawn = Rect::new(area.x, area.y, self.width().min(area.width), 1);
        let text = format!("[ {} ]", self.label);
        draw_text_span(&mut frame.buffer, drawn.x, drawn.y, &text, style, drawn.right());

        frame.register(
            SemanticNode::new(Role::Button, drawn)
                .text(&self.label)
                .focused(self.focused),
        );
    }
}
