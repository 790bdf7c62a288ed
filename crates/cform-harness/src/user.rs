#![forbid(unsafe_code)]

//! Drive a model the way a user would.
//!
//! Every action is delivered as terminal events (clicks, key presses,
//! characters) through [`ProgramSimulator`], and the model is re-rendered
//! afterwards so [`UserSession::screen`] always reflects the latest state.

use cform_core::event::{Event, KeyCode};
use cform_core::geometry::Rect;
use cform_render::frame::Frame;
use cform_runtime::program::Model;
use cform_runtime::simulator::ProgramSimulator;

use crate::screen::Screen;

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

pub struct UserSession<M: Model> {
    sim: ProgramSimulator<M>,
    frame: Frame,
    width: u16,
    height: u16,
}

impl<M: Model> UserSession<M> {
    /// Initialize `model` and render it at the default size.
    pub fn new(model: M) -> Self {
        Self::with_size(model, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_size(model: M, width: u16, height: u16) -> Self {
        let mut sim = ProgramSimulator::new(model);
        sim.init();
        let mut session = Self {
            sim,
            frame: Frame::new(width, height),
            width,
            height,
        };
        session.render();
        session
    }

    fn render(&mut self) {
        self.frame = self.sim.capture_frame(self.width, self.height).clone();
    }

    /// Queries over the latest render.
    pub fn screen(&self) -> Screen<'_> {
        Screen::new(&self.frame)
    }

    /// Left-click the top-left cell of `area`.
    pub fn click(&mut self, area: Rect) {
        self.sim.inject_event(Event::left_click(area.x, area.y));
        self.render();
    }

    /// Type into whatever has focus.
    pub fn keyboard(&mut self, text: &str) {
        let events: Vec<Event> = text.chars().map(Event::char).collect();
        self.sim.inject_events(&events);
        self.render();
    }

    /// Click `area` to focus it, then type `text`.
    pub fn type_into(&mut self, area: Rect, text: &str) {
        self.click(area);
        self.keyboard(text);
    }

    pub fn press(&mut self, code: KeyCode) {
        self.sim.inject_event(Event::key(code));
        self.render();
    }

    /// Paste `text` as one bracketed-paste event.
    pub fn paste(&mut self, text: &str) {
        self.sim.inject_event(Event::Paste(text.to_string()));
        self.render();
    }

    /// Change the render size and re-render.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.sim.inject_event(Event::Resize { width, height });
        self.render();
    }

    pub fn model(&self) -> &M {
        self.sim.model()
    }

    pub fn simulator(&self) -> &ProgramSimulator<M> {
        &self.sim
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cform_core::event::KeyEvent;
    use cform_render::semantics::Role;
    use cform_runtime::program::Cmd;
    use cform_widgets::{Button, TextInput, Widget};

    /// One input and a button that copies the input into `echo`.
    struct Echo {
        input: TextInput,
        echo: String,
    }

    enum Msg {
        Key(KeyEvent),
        Click(u16, u16),
        Other,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) => Self::Key(k),
                Event::Mouse(m) if m.is_left_down() => Self::Click(m.x, m.y),
                _ => Self::Other,
            }
        }
    }

    impl Model for Echo {
        type Message = Msg;

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Key(k) if k.code == KeyCode::Escape => return Cmd::quit(),
                Msg::Key(k) if self.input.is_focused() => {
                    self.input.handle_event(&Event::Key(k));
                }
                Msg::Click(_, 2) => self.echo = self.input.value().to_string(),
                Msg::Click(_, 0) => self.input.set_focused(true),
                Msg::Key(_) | Msg::Click(..) | Msg::Other => {}
            }
            Cmd::none()
        }

        fn view(&self, frame: &mut Frame) {
            self.input.render(Rect::new(0, 0, 20, 1), frame);
            Button::new("Go").render(Rect::new(0, 2, 6, 1), frame);
            if !self.echo.is_empty() {
                frame.region("echo", |f| {
                    cform_widgets::Paragraph::new(self.echo.as_str())
                        .render(Rect::new(0, 4, 20, 1), f);
                });
            }
        }
    }

    fn session() -> UserSession<Echo> {
        UserSession::with_size(
            Echo {
                input: TextInput::new().with_placeholder("say"),
                echo: String::new(),
            },
            30,
            6,
        )
    }

    #[test]
    fn type_click_and_query() {
        let mut user = session();
        let input = user.screen().get_by_placeholder("say").area;
        user.type_into(input, "hi");
        assert_eq!(
            user.screen().get_by_placeholder("say").value.as_deref(),
            Some("hi")
        );

        let button = user.screen().get_by_role(Role::Button).area;
        user.click(button);
        let echo = user.screen().within("echo").get_by_text("hi");
        assert_eq!(echo.area.y, 4);
        assert!(user.screen().text().lines().nth(4).is_some_and(|l| l.starts_with("hi")));
    }

    #[test]
    fn typing_without_focus_is_ignored() {
        let mut user = session();
        user.keyboard("x");
        assert_eq!(user.model().input.value(), "");
    }

    #[test]
    fn escape_stops_session() {
        let mut user = session();
        user.press(KeyCode::Escape);
        assert!(!user.is_running());
    }

    #[test]
    fn every_action_renders() {
        let mut user = session();
        let before = user.simulator().frame_count();
        user.press(KeyCode::Left);
        user.resize(40, 8);
        assert_eq!(user.simulator().frame_count(), before + 2);
        assert_eq!(user.screen().frame().width(), 40);
    }
}
