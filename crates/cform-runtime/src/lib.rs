#![forbid(unsafe_code)]

//! Runtime for the contact form: the [`Model`]/[`Cmd`] contract, the
//! crossterm-backed [`Program`] loop, and a [`ProgramSimulator`] that drives
//! models without a terminal.

pub mod program;
pub mod simulator;
pub mod terminal_session;
pub mod terminal_writer;

pub use program::{Cmd, Model, Program, ProgramConfig};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use terminal_session::{SessionOptions, TerminalSession};
pub use terminal_writer::TerminalWriter;
