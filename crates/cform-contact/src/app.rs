#![forbid(unsafe_code)]

//! The contact form as a [`Model`].
//!
//! Widgets own cursor and scroll state while editing; [`FormState`] owns the
//! values, errors, and submission. Every edit that changes a widget's text
//! is pushed into the form state so validation runs on each change.
//!
//! Layout is recomputed in `view` in content rows, which may outnumber the
//! frame's rows. The view scrolls to keep the focused widget on screen, and
//! PageUp/PageDown or the mouse wheel scroll it by hand. Hit areas are cached
//! in `Cell`s in screen coordinates so mouse clicks in `update` resolve
//! against what was last drawn.

use std::cell::Cell;

use cform_core::event::{Event, KeyCode, KeyEvent, MouseEventKind};
use cform_core::geometry::Rect;
use cform_render::Style;
use cform_render::frame::Frame;
use cform_runtime::program::{Cmd, Model};
use cform_widgets::paragraph::wrap_lines;
use cform_widgets::{Button, Paragraph, TextArea, TextInput, ValidationErrorDisplay, Widget};
use tracing::debug;

use crate::config::ContactFormConfig;
use crate::field::FieldId;
use crate::state::{FormState, SubmitOutcome, Submission};

pub const TITLE: &str = "Contact Form";
pub const SUBMIT_LABEL: &str = "Submit";
/// Name of the region echoing the last submission.
pub const SUBMITTED_REGION: &str = "You Submitted";

const MARGIN_X: u16 = 2;
const MAX_INPUT_WIDTH: u16 = 48;
const MESSAGE_ROWS: u16 = 3;
const SUMMARY_LABEL_WIDTH: u16 = 12;
/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

/// Something that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(FieldId),
    Submit,
}

impl FocusTarget {
    const ORDER: [FocusTarget; 5] = [
        Self::Field(FieldId::FirstName),
        Self::Field(FieldId::LastName),
        Self::Field(FieldId::Email),
        Self::Field(FieldId::Message),
        Self::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Messages driving the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A key for the focused widget (or Enter to submit).
    Key(KeyEvent),
    Paste(String),
    /// Left click at a cell.
    Click { x: u16, y: u16 },
    FocusNext,
    FocusPrev,
    Focus(FocusTarget),
    /// Scroll the form by rows; negative moves up.
    Scroll(i32),
    PageUp,
    PageDown,
    Submit,
    Quit,
    Ignore,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) if !k.is_actionable() => Self::Ignore,
            Event::Key(k) if k.code == KeyCode::Escape => Self::Quit,
            Event::Key(k) if k.ctrl() && k.is_char('c') => Self::Quit,
            Event::Key(k) if k.code == KeyCode::Tab => Self::FocusNext,
            Event::Key(k) if k.code == KeyCode::BackTab => Self::FocusPrev,
            Event::Key(k) if k.code == KeyCode::PageUp => Self::PageUp,
            Event::Key(k) if k.code == KeyCode::PageDown => Self::PageDown,
            Event::Key(k) => Self::Key(k),
            Event::Mouse(m) if m.is_left_down() => Self::Click { x: m.x, y: m.y },
            Event::Mouse(m) if m.kind == MouseEventKind::ScrollUp => Self::Scroll(-WHEEL_ROWS),
            Event::Mouse(m) if m.kind == MouseEventKind::ScrollDown => Self::Scroll(WHEEL_ROWS),
            Event::Paste(text) => Self::Paste(text),
            _ => Self::Ignore,
        }
    }
}

/// Content rows of one field, before scrolling.
#[derive(Debug, Clone, Copy, Default)]
struct FieldRows {
    label: u32,
    input: u32,
    input_height: u16,
    error: Option<u32>,
}

impl FieldRows {
    fn end(&self) -> u32 {
        self.error
            .map_or(self.input + u32::from(self.input_height), |e| e + 1)
    }
}

/// One echoed value: its field, first row, and wrapped line count.
#[derive(Debug, Clone, Copy)]
struct EchoRow {
    field: FieldId,
    y: u32,
    lines: u32,
}

/// Where everything goes in content rows. Content can be taller than the
/// frame; the visible window is chosen by [`Viewport`].
#[derive(Debug, Clone, Default)]
struct Layout {
    fields: [FieldRows; 4],
    button: u32,
    heading: Option<u32>,
    echo: Vec<EchoRow>,
    /// Row after the last drawn row.
    total: u32,
}

impl Layout {
    /// Rows that should be on screen while `focus` holds focus. Focusing
    /// the button also reveals the submission below it.
    fn focus_span(&self, focus: FocusTarget) -> (u32, u32) {
        match focus {
            FocusTarget::Field(field) => {
                let rows = self.fields[field as usize];
                (rows.label, rows.end())
            }
            FocusTarget::Submit => (self.button, self.total),
        }
    }
}

/// The rows of the layout currently on screen.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    offset: u32,
    height: u16,
}

impl Viewport {
    /// Screen rect for `rows` content rows at `y`, only if all are visible.
    fn block(&self, x: u16, y: u32, width: u16, rows: u16) -> Option<Rect> {
        let top = u16::try_from(y.checked_sub(self.offset)?).ok()?;
        (u32::from(top) + u32::from(rows) <= u32::from(self.height))
            .then(|| Rect::new(x, top, width, rows))
    }

    /// The visible part of `rows` content rows at `y`: the screen row, the
    /// visible height, and how many leading rows are scrolled off.
    fn span(&self, y: u32, rows: u32) -> Option<(u16, u16, usize)> {
        let start = y.max(self.offset);
        let end = y
            .saturating_add(rows)
            .min(self.offset.saturating_add(u32::from(self.height)));
        if start >= end {
            return None;
        }
        let top = u16::try_from(start - self.offset).ok()?;
        let height = u16::try_from(end - start).ok()?;
        let skipped = usize::try_from(start - y).ok()?;
        Some((top, height, skipped))
    }
}

pub struct ContactFormApp {
    config: ContactFormConfig,
    state: FormState,
    /// Single-line editors for first name, last name, email.
    inputs: [TextInput; 3],
    message: TextArea,
    focus: FocusTarget,
    /// First content row on screen, settled by the last `view`.
    scroll: Cell<u32>,
    /// Keep the focused widget on screen. Cleared by manual scrolling.
    follow_focus: bool,
    viewport_height: Cell<u16>,
    layout_fields: [Cell<Rect>; 4],
    layout_submit: Cell<Rect>,
}

impl Default for ContactFormApp {
    fn default() -> Self {
        Self::new(ContactFormConfig::default())
    }
}

impl ContactFormApp {
    pub fn new(config: ContactFormConfig) -> Self {
        let input = |field: FieldId| {
            TextInput::new()
                .with_label(field.label())
                .with_placeholder(config.placeholder(field).unwrap_or_default())
        };
        let inputs = [
            input(FieldId::FirstName).with_focused(true),
            input(FieldId::LastName),
            input(FieldId::Email),
        ];
        Self {
            state: FormState::from_config(&config),
            inputs,
            message: TextArea::new().with_label(FieldId::Message.label()),
            focus: FocusTarget::Field(FieldId::FirstName),
            scroll: Cell::new(0),
            follow_focus: true,
            viewport_height: Cell::new(0),
            layout_fields: Default::default(),
            layout_submit: Cell::new(Rect::default()),
            config,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &ContactFormConfig {
        &self.config
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    /// First content row shown by the last render.
    pub fn scroll_offset(&self) -> u32 {
        self.scroll.get()
    }

    /// The last accepted submission, if any.
    pub fn submitted(&self) -> Option<&Submission> {
        self.state.submitted()
    }

    fn input_index(field: FieldId) -> Option<usize> {
        match field {
            FieldId::FirstName => Some(0),
            FieldId::LastName => Some(1),
            FieldId::Email => Some(2),
            FieldId::Message => None,
        }
    }

    fn set_focus(&mut self, target: FocusTarget) {
        self.follow_focus = true;
        if self.focus == target {
            return;
        }
        debug!(from = ?self.focus, to = ?target, "focus changed");
        self.focus = target;
        for field in FieldId::all() {
            let focused = target == FocusTarget::Field(field);
            match Self::input_index(field) {
                Some(i) => self.inputs[i].set_focused(focused),
                None => self.message.set_focused(focused),
            }
        }
    }

    /// Route an event to the focused editor, pushing any text change into
    /// the form state.
    fn edit_focused(&mut self, event: &Event) -> bool {
        let FocusTarget::Field(field) = self.focus else {
            return false;
        };
        let (consumed, value) = match Self::input_index(field) {
            Some(i) => {
                let input = &mut self.inputs[i];
                let consumed = input.handle_event(event);
                (consumed, input.value().to_string())
            }
            None => {
                let consumed = self.message.handle_event(event);
                (consumed, self.message.value())
            }
        };
        if consumed {
            self.follow_focus = true;
            if value != self.state.value(field) {
                self.state.set_value(field, value);
            }
        }
        consumed
    }

    fn submit(&mut self) -> Cmd<Msg> {
        self.follow_focus = true;
        match self.state.submit() {
            SubmitOutcome::Accepted(_) => {
                if self.state.clear_on_submit() {
                    for input in &mut self.inputs {
                        input.clear();
                    }
                    self.message.clear();
                }
                Cmd::log("submission accepted")
            }
            SubmitOutcome::Rejected(errors) => {
                Cmd::log(format!("submission rejected: {} error(s)", errors.len()))
            }
        }
    }

    fn scroll_by(&mut self, delta: i64) {
        self.follow_focus = false;
        let rows = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        let current = self.scroll.get();
        self.scroll.set(if delta < 0 {
            current.saturating_sub(rows)
        } else {
            current.saturating_add(rows)
        });
    }

    fn page_rows(&self) -> i64 {
        i64::from(self.viewport_height.get().saturating_sub(1).max(1))
    }

    fn hit_test(&self, x: u16, y: u16) -> Option<FocusTarget> {
        if self.layout_submit.get().contains(x, y) {
            return Some(FocusTarget::Submit);
        }
        FieldId::all()
            .zip(&self.layout_fields)
            .find(|(_, area)| area.get().contains(x, y))
            .map(|(field, _)| FocusTarget::Field(field))
    }

    fn input_width(width: u16) -> u16 {
        width.saturating_sub(MARGIN_X * 2).min(MAX_INPUT_WIDTH)
    }

    fn echo_width(width: u16) -> u16 {
        width
            .saturating_sub(MARGIN_X + SUMMARY_LABEL_WIDTH + MARGIN_X)
            .max(1)
    }

    /// Lay out the whole form at `width` in content rows.
    fn layout(&self, width: u16) -> Layout {
        let mut layout = Layout::default();
        let mut y: u32 = 2;
        for field in FieldId::all() {
            let input_height = if field.is_multiline() { MESSAGE_ROWS } else { 1 };
            let mut rows = FieldRows {
                label: y,
                input: y + 1,
                input_height,
                error: None,
            };
            y = rows.input + u32::from(input_height);
            if self.state.error(field).is_some() {
                rows.error = Some(y);
                y += 1;
            }
            layout.fields[field as usize] = rows;
            y += 1;
        }

        layout.button = y;
        y += 1;
        if let Some(submission) = self.state.submitted() {
            y += 1;
            layout.heading = Some(y);
            y += 1;
            let value_width = usize::from(Self::echo_width(width));
            for field in FieldId::all() {
                if field == FieldId::Message && !submission.has_message() {
                    continue;
                }
                let lines = wrap_lines(submission.get(field), value_width).len();
                let lines = u32::try_from(lines).unwrap_or(u32::MAX);
                layout.echo.push(EchoRow { field, y, lines });
                y = y.saturating_add(lines);
            }
        }
        layout.total = y;
        layout
    }

    /// Settle the scroll offset for a frame `height` rows tall.
    fn settle_scroll(&self, layout: &Layout, height: u16) -> u32 {
        let height = u32::from(height);
        let max = layout.total.saturating_sub(height);
        let mut offset = self.scroll.get().min(max);
        if self.follow_focus {
            let (top, bottom) = layout.focus_span(self.focus);
            if top < offset || bottom - top > height {
                offset = top;
            } else if bottom > offset.saturating_add(height) {
                offset = bottom - height;
            }
        }
        offset.min(max)
    }

    fn render_field(&self, frame: &mut Frame, view: Viewport, field: FieldId, rows: FieldRows) {
        let width = Self::input_width(frame.width());
        if let Some(area) = view.block(MARGIN_X, rows.label, width, 1) {
            Paragraph::new(field.label()).render(area, frame);
        }

        let area = view
            .block(MARGIN_X, rows.input, width, rows.input_height)
            .unwrap_or_default();
        if !area.is_empty() {
            match Self::input_index(field) {
                Some(i) => self.inputs[i].render(area, frame),
                None => self.message.render(area, frame),
            }
        }
        self.layout_fields[field as usize].set(area);

        if let (Some(err), Some(y)) = (self.state.error(field), rows.error) {
            let w = frame.width().saturating_sub(MARGIN_X);
            if let Some(area) = view.block(MARGIN_X, y, w, 1) {
                ValidationErrorDisplay::new(err.to_string()).render(area, frame);
            }
        }
    }

    fn render_submission(
        &self,
        frame: &mut Frame,
        view: Viewport,
        layout: &Layout,
        submission: &Submission,
    ) {
        let width = frame.width().saturating_sub(MARGIN_X * 2);
        let value_x = MARGIN_X + SUMMARY_LABEL_WIDTH;
        let value_width = Self::echo_width(frame.width());
        frame.region(SUBMITTED_REGION, |frame| {
            if let Some(area) = layout.heading.and_then(|y| view.block(MARGIN_X, y, width, 1)) {
                Paragraph::heading("You Submitted:").render(area, frame);
            }
            for row in &layout.echo {
                if let Some(area) = view.block(MARGIN_X, row.y, SUMMARY_LABEL_WIDTH, 1) {
                    Paragraph::new(echo_label(row.field))
                        .style(Style::new().bold())
                        .render(area, frame);
                }
                if let Some((top, height, skipped)) = view.span(row.y, row.lines) {
                    Paragraph::new(submission.get(row.field))
                        .wrap(true)
                        .scroll(skipped)
                        .render(Rect::new(value_x, top, value_width, height), frame);
                }
            }
        });
    }
}

fn echo_label(field: FieldId) -> &'static str {
    match field {
        FieldId::FirstName => "First Name:",
        FieldId::LastName => "Last Name:",
        FieldId::Email => "Email:",
        FieldId::Message => "Message:",
    }
}

impl Model for ContactFormApp {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Quit => Cmd::quit(),
            Msg::FocusNext => {
                self.set_focus(self.focus.next());
                Cmd::none()
            }
            Msg::FocusPrev => {
                self.set_focus(self.focus.prev());
                Cmd::none()
            }
            Msg::Focus(target) => {
                self.set_focus(target);
                Cmd::none()
            }
            Msg::Scroll(rows) => {
                self.scroll_by(i64::from(rows));
                Cmd::none()
            }
            Msg::PageUp => {
                self.scroll_by(-self.page_rows());
                Cmd::none()
            }
            Msg::PageDown => {
                self.scroll_by(self.page_rows());
                Cmd::none()
            }
            Msg::Submit => self.submit(),
            Msg::Click { x, y } => match self.hit_test(x, y) {
                Some(FocusTarget::Submit) => {
                    self.set_focus(FocusTarget::Submit);
                    self.submit()
                }
                Some(target) => {
                    self.set_focus(target);
                    Cmd::none()
                }
                None => Cmd::none(),
            },
            Msg::Key(key) => {
                let multiline = self.focus == FocusTarget::Field(FieldId::Message);
                match key.code {
                    KeyCode::Enter if !multiline => self.submit(),
                    KeyCode::Char(' ') if self.focus == FocusTarget::Submit => self.submit(),
                    _ => {
                        self.edit_focused(&Event::Key(key));
                        Cmd::none()
                    }
                }
            }
            Msg::Paste(text) => {
                self.edit_focused(&Event::Paste(text));
                Cmd::none()
            }
            Msg::Ignore => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let layout = self.layout(frame.width());
        let offset = self.settle_scroll(&layout, frame.height());
        self.scroll.set(offset);
        self.viewport_height.set(frame.height());
        let view = Viewport {
            offset,
            height: frame.height(),
        };

        let width = frame.width().saturating_sub(MARGIN_X * 2);
        if let Some(area) = view.block(MARGIN_X, 0, width, 1) {
            Paragraph::heading(TITLE).render(area, frame);
        }

        for field in FieldId::all() {
            self.render_field(frame, view, field, layout.fields[field as usize]);
        }

        let button = Button::new(SUBMIT_LABEL).with_focused(self.focus == FocusTarget::Submit);
        let button_area = view
            .block(MARGIN_X, layout.button, button.width(), 1)
            .unwrap_or_default();
        if !button_area.is_empty() {
            button.render(button_area, frame);
        }
        self.layout_submit.set(button_area);

        if let Some(submission) = self.state.submitted() {
            self.render_submission(frame, view, &layout, submission);
        }
    }
}
