#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without a real terminal, enabling
//! event injection, direct message sends, and frame capture. Captured frames
//! keep their accessibility tree, so tests can query what a user would find
//! on screen.
//!
//! # Example
//!
//! ```ignore
//! use cform_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(Counter { value: 0 });
//! sim.init();
//! sim.send(Msg::Increment);
//! assert_eq!(sim.model().value, 1);
//!
//! let frame = sim.capture_frame(80, 24);
//! assert_eq!(frame.buffer.row_text(0).trim_end(), "Count: 1");
//! ```

use crate::program::{Cmd, Model};
use cform_core::event::Event;
use cform_render::frame::Frame;

/// Record of a command executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    /// Message fed back into the model (not stored).
    Msg,
    /// Batch with its element count.
    Batch(usize),
    Log(String),
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Frame>,
    command_log: Vec<CmdRecord>,
    running: bool,
    logs: Vec<String>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a simulator. The model is not initialized until
    /// [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            running: true,
            logs: Vec::new(),
        }
    }

    /// Call `Model::init()` and execute the returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Convert each event to a message and dispatch it through
    /// `Model::update()`. Stops early once the model quits.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            if !self.running {
                break;
            }
            let msg = M::Message::from(event.clone());
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Dispatch a message directly. Ignored after quit.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Render the model into a fresh frame and store it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Frame {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        self.frames.push(frame);
        let last = self.frames.len() - 1;
        &self.frames[last]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// `false` once a `Cmd::Quit` has executed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Log lines emitted via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {
                self.command_log.push(CmdRecord::None);
            }
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cform_core::event::KeyCode;
    use cform_render::cell::Cell;
    use cform_render::semantics::{Role, SemanticNode};
    use proptest::prelude::*;

    // ---------- Test model ----------

    struct Counter {
        value: i32,
        initialized: bool,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Decrement,
        Quit,
        LogValue,
        BatchIncrement(usize),
    }

    impl From<Event> for CounterMsg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('-') => CounterMsg::Decrement,
                Event::Key(k) if k.is_char('q') => CounterMsg::Quit,
                Event::Key(k) if k.is_char('l') => CounterMsg::LogValue,
                _ => CounterMsg::Increment,
            }
        }
    }

    impl Model for Counter {
        type Message = CounterMsg;

        fn init(&mut self) -> Cmd<Self::Message> {
            self.initialized = true;
            Cmd::none()
        }

        fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
            match msg {
                CounterMsg::Increment => {
                    self.value += 1;
                    Cmd::none()
                }
                CounterMsg::Decrement => {
                    self.value -= 1;
                    Cmd::none()
                }
                CounterMsg::Quit => Cmd::quit(),
                CounterMsg::LogValue => Cmd::log(format!("value={}", self.value)),
                CounterMsg::BatchIncrement(n) => {
                    let cmds: Vec<_> = (0..n).map(|_| Cmd::msg(CounterMsg::Increment)).collect();
                    Cmd::batch(cmds)
                }
            }
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("Count: {}", self.value);
            for (i, c) in text.chars().enumerate() {
                frame.buffer.set(i as u16, 0, Cell::from_char(c));
            }
            frame.register(
                SemanticNode::new(Role::Text, frame.bounds().row(0)).text(text),
            );
        }
    }

    fn counter() -> ProgramSimulator<Counter> {
        ProgramSimulator::new(Counter {
            value: 0,
            initialized: false,
        })
    }

    // ---------- Tests ----------

    #[test]
    fn new_simulator() {
        let sim = counter();
        assert!(sim.is_running());
        assert_eq!(sim.model().value, 0);
        assert!(!sim.model().initialized);
        assert_eq!(sim.frame_count(), 0);
        assert!(sim.logs().is_empty());
    }

    #[test]
    fn init_calls_model_init() {
        let mut sim = counter();
        sim.init();
        assert!(sim.model().initialized);
    }

    #[test]
    fn inject_events_processes_all() {
        let mut sim = counter();
        sim.init();
        sim.inject_events(&[Event::char('+'), Event::char('+'), Event::char('+')]);
        assert_eq!(sim.model().value, 3);
    }

    #[test]
    fn inject_events_stops_on_quit() {
        let mut sim = counter();
        sim.init();
        sim.inject_events(&[Event::char('+'), Event::char('q'), Event::char('+')]);
        assert_eq!(sim.model().value, 1);
        assert!(!sim.is_running());
    }

    #[test]
    fn send_after_quit_is_ignored() {
        let mut sim = counter();
        sim.send(CounterMsg::Quit);
        sim.send(CounterMsg::Increment);
        assert_eq!(sim.model().value, 0);
    }

    #[test]
    fn batch_messages_recurse() {
        let mut sim = counter();
        sim.send(CounterMsg::BatchIncrement(3));
        assert_eq!(sim.model().value, 3);
        assert_eq!(sim.command_log()[0], CmdRecord::Batch(3));
    }

    #[test]
    fn logs_are_recorded() {
        let mut sim = counter();
        sim.inject_event(Event::char('+'));
        sim.inject_event(Event::char('l'));
        assert_eq!(sim.logs(), ["value=1"]);
    }

    #[test]
    fn capture_frame_keeps_cells_and_semantics() {
        let mut sim = counter();
        sim.send(CounterMsg::Decrement);
        let frame = sim.capture_frame(12, 2);
        assert_eq!(frame.buffer.row_text(0), "Count: -1   ");
        assert_eq!(frame.semantics.nodes()[0].text, "Count: -1");
        assert_eq!(sim.frame_count(), 1);
        assert!(sim.last_frame().is_some());
        sim.clear_frames();
        assert_eq!(sim.frame_count(), 0);
    }

    #[test]
    fn unmapped_keys_still_reach_update() {
        let mut sim = counter();
        sim.inject_event(Event::key(KeyCode::Tab));
        assert_eq!(sim.model().value, 1);
    }

    #[test]
    fn model_mut_allows_direct_setup() {
        let mut sim = counter();
        sim.model_mut().value = 41;
        sim.send(CounterMsg::Increment);
        assert_eq!(sim.model().value, 42);
    }

    proptest! {
        #[test]
        fn events_after_quit_are_dropped(
            keys in proptest::collection::vec(prop::sample::select(vec!['+', '-', 'l', 'q']), 0..64)
        ) {
            let mut sim = counter();
            sim.init();
            let events: Vec<Event> = keys.iter().copied().map(Event::char).collect();
            sim.inject_events(&events);

            let live: Vec<char> = keys.iter().copied().take_while(|&c| c != 'q').collect();
            let expected: i32 = live
                .iter()
                .map(|&c| match c {
                    '+' => 1,
                    '-' => -1,
                    _ => 0,
                })
                .sum();
            prop_assert_eq!(sim.model().value, expected);
            prop_assert_eq!(sim.is_running(), !keys.contains(&'q'));
            prop_assert_eq!(sim.logs().len(), live.iter().filter(|&&c| c == 'l').count());
        }

        #[test]
        fn batch_runs_every_message(n in 0usize..200) {
            let mut sim = counter();
            sim.send(CounterMsg::BatchIncrement(n));
            prop_assert_eq!(sim.model().value, i32::try_from(n).unwrap());
        }
    }
}
