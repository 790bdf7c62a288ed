#![forbid(unsafe_code)]

//! Elm-style runtime for terminal applications.
//!
//! The program runtime manages the update/view loop, handling events and
//! rendering frames. It separates state (Model) from rendering (View) and
//! provides a command pattern for side effects.
//!
//! # Example
//!
//! ```ignore
//! use cform_runtime::program::{Cmd, Model};
//! use cform_core::event::Event;
//! use cform_render::frame::Frame;
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Quit,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Increment,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {}
//! }
//! ```

use std::io::{self, Stdout};
use std::time::Duration;

use cform_core::event::Event;
use cform_render::frame::Frame;
use tracing::{debug, debug_span, info, info_span};

use crate::terminal_session::{SessionOptions, TerminalSession};
use crate::terminal_writer::TerminalWriter;

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages driving state transitions. Must be convertible from
    /// terminal events.
    type Message: From<Event>;

    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply a message. Returns commands for any side effects.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state into `frame`, registering accessibility
    /// nodes alongside the cells.
    fn view(&self, frame: &mut Frame);
}

/// Side effects requested by `init()` and `update()`.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the program.
    Quit,
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Feed a message back into `update()`.
    Msg(M),
    /// Emit a log line.
    ///
    /// The full-screen runtime routes this to the tracing subscriber; the
    /// simulator records it.
    Log(String),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Combine commands, collapsing empty and single-element batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Stable name for tracing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
        }
    }

    /// Whether executing this command would stop the program.
    pub fn is_quit(&self) -> bool {
        match self {
            Self::Quit => true,
            Self::Batch(cmds) => cmds.iter().any(Self::is_quit),
            _ => false,
        }
    }
}

/// Runtime options.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Capture mouse events.
    pub mouse: bool,
    /// Enable bracketed paste so pasted text arrives as one event.
    pub bracketed_paste: bool,
    /// How long to wait for input before checking state again.
    pub poll_interval: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            bracketed_paste: true,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl ProgramConfig {
    #[must_use]
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Full-screen program driving a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    running: bool,
    dirty: bool,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, ProgramConfig::default())
    }

    pub fn with_config(model: M, config: ProgramConfig) -> Self {
        Self {
            model,
            config,
            running: true,
            dirty: true,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consume the program, returning the final model state.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Run until the model quits.
    ///
    /// The terminal is restored before this returns, on success or error.
    ///
    /// # Errors
    ///
    /// Returns terminal I/O errors from setup, event reads, or presenting.
    pub fn run(&mut self) -> io::Result<()> {
        let _span = info_span!("program_run").entered();
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: true,
            mouse_capture: self.config.mouse,
            bracketed_paste: self.config.bracketed_paste,
        })?;
        let (mut width, mut height) = session.size()?;
        info!(width, height, mouse = self.config.mouse, "program started");

        let mut writer = TerminalWriter::new(io::stdout());

        let cmd = self.model.init();
        self.execute_cmd(cmd);

        while self.running {
            if self.dirty {
                self.render(&mut writer, width, height)?;
            }
            if !session.poll_event(self.config.poll_interval)? {
                continue;
            }
            let Some(event) = session.read_event()? else {
                continue;
            };
            if let Event::Resize {
                width: w,
                height: h,
            } = event
            {
                width = w;
                height = h;
                writer.invalidate();
                debug!(width, height, "terminal resized");
            }
            self.handle_event(event);
        }

        info!("program stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let msg = M::Message::from(event);
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn render(&mut self, writer: &mut TerminalWriter<Stdout>, width: u16, height: u16) -> io::Result<()> {
        let _span = debug_span!("render", width, height).entered();
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        writer.present(&frame.buffer, frame.cursor_position)?;
        self.dirty = false;
        Ok(())
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.dirty = true;
                self.execute_cmd(cmd);
            }
            Cmd::Log(text) => {
                info!(target: "cform::app", "{text}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_collapses() {
        assert!(matches!(Cmd::<()>::batch(vec![]), Cmd::None));
        assert!(matches!(Cmd::<()>::batch(vec![Cmd::None, Cmd::Quit]), Cmd::Quit));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::log("a"), Cmd::Quit]),
            Cmd::Batch(ref v) if v.len() == 2
        ));
    }

    #[test]
    fn is_quit_looks_into_batches() {
        let cmd: Cmd<()> = Cmd::Batch(vec![Cmd::log("bye"), Cmd::Quit]);
        assert!(cmd.is_quit());
        assert!(!Cmd::<()>::none().is_quit());
    }

    #[test]
    fn type_names() {
        assert_eq!(Cmd::<()>::quit().type_name(), "Quit");
        assert_eq!(Cmd::msg(()).type_name(), "Msg");
        assert_eq!(format!("{:?}", Cmd::<()>::log("x")), "Log(\"x\")");
    }

    #[test]
    fn config_builders() {
        let cfg = ProgramConfig::default()
            .with_mouse(false)
            .with_poll_interval(Duration::from_millis(5));
        assert!(!cfg.mouse);
        assert!(cfg.bracketed_paste);
        assert_eq!(cfg.poll_interval, Duration::from_millis(5));
    }
}
