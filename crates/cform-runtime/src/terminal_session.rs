#![forbid(unsafe_code)]

//! Raw-mode guard for the form's terminal.
//!
//! The form edits text in place, so it needs raw input, its own screen, and
//! (for clicks and bracketed paste) extra reporting modes. [`TerminalSession`]
//! switches these on one at a time and remembers which succeeded; dropping it
//! switches them off again, last first, then leaves raw mode.
//!
//! A crash or Ctrl-C must not strand the user's shell in raw mode, so a panic
//! hook and (on unix) a SIGINT/SIGTERM thread undo every mode the form can
//! set, whether or not it was set.

use std::io::{self, Write};
use std::sync::Once;
use std::time::Duration;

use cform_core::event::Event;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal modes to enable. All default to `false`.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Draw on the alternate screen so the shell's scrollback survives.
    pub alternate_screen: bool,
    /// Report clicks and wheel motion.
    pub mouse_capture: bool,
    /// Deliver pastes as one event instead of a burst of keys.
    pub bracketed_paste: bool,
}

impl SessionOptions {
    /// Requested modes in the order they are switched on.
    fn modes(&self) -> Vec<TermMode> {
        [
            (self.alternate_screen, TermMode::AltScreen),
            (self.mouse_capture, TermMode::Mouse),
            (self.bracketed_paste, TermMode::Paste),
        ]
        .into_iter()
        .filter_map(|(wanted, mode)| wanted.then_some(mode))
        .collect()
    }
}

/// A reversible terminal mode on top of raw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermMode {
    AltScreen,
    Mouse,
    Paste,
}

impl TermMode {
    const ALL: [TermMode; 3] = [Self::AltScreen, Self::Mouse, Self::Paste];

    fn name(self) -> &'static str {
        match self {
            Self::AltScreen => "alternate screen",
            Self::Mouse => "mouse capture",
            Self::Paste => "bracketed paste",
        }
    }

    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AltScreen => crossterm::execute!(out, crossterm::terminal::EnterAlternateScreen),
            Self::Mouse => crossterm::execute!(out, crossterm::event::EnableMouseCapture),
            Self::Paste => crossterm::execute!(out, crossterm::event::EnableBracketedPaste),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AltScreen => crossterm::execute!(out, crossterm::terminal::LeaveAlternateScreen),
            Self::Mouse => crossterm::execute!(out, crossterm::event::DisableMouseCapture),
            Self::Paste => crossterm::execute!(out, crossterm::event::DisableBracketedPaste),
        }
    }
}

/// Owns raw mode and the modes in [`SessionOptions`] for its lifetime.
///
/// Create at most one at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    /// Modes switched on so far, in order.
    active: Vec<TermMode>,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and switch on the requested modes.
    ///
    /// # Errors
    ///
    /// Fails if raw mode or any requested mode cannot be set. Modes already
    /// switched on are switched off again before returning.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("raw mode on");

        let mut session = Self {
            active: Vec::new(),
            #[cfg(unix)]
            signal_guard: None,
            options,
        };
        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::spawn()?);
        }

        let mut out = io::stdout();
        for mode in session.options.modes() {
            mode.enable(&mut out)?;
            session.active.push(mode);
            tracing::info!(mode = mode.name(), "terminal mode on");
        }
        Ok(session)
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for input; `Ok(true)` when an event is ready.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Block for the next event. `Ok(None)` for input the form ignores.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        crossterm::event::read().map(Event::from_crossterm)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        drop(self.signal_guard.take());

        let mut out = io::stdout();
        while let Some(mode) = self.active.pop() {
            if let Err(err) = mode.disable(&mut out) {
                tracing::warn!(mode = mode.name(), %err, "failed to switch off terminal mode");
            }
        }
        restore_base(&mut out);
        tracing::info!("terminal restored");
    }
}

/// Cursor back, raw mode off, output flushed.
fn restore_base(out: &mut impl Write) {
    let _ = crossterm::execute!(out, crossterm::cursor::Show);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Undo everything the form could have set, without knowing what it did.
fn restore_all() {
    let mut out = io::stdout();
    for mode in TermMode::ALL.into_iter().rev() {
        let _ = mode.disable(&mut out);
    }
    restore_base(&mut out);
}

fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let chained = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_all();
            chained(info);
        }));
    });
}

/// Restores the terminal and exits when SIGINT or SIGTERM arrives.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    watcher: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn spawn() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let watcher = std::thread::spawn(move || {
            let Some(signal) = signals.forever().next() else {
                return;
            };
            tracing::warn!(signal, "interrupted, restoring terminal");
            restore_all();
            std::process::exit(128 + signal);
        });
        Ok(Self {
            handle,
            watcher: Some(watcher),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_disabled() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
        assert!(!opts.mouse_capture);
        assert!(!opts.bracketed_paste);
        assert!(opts.modes().is_empty());
    }

    #[test]
    fn modes_follow_options_in_enable_order() {
        let opts = SessionOptions {
            alternate_screen: true,
            mouse_capture: false,
            bracketed_paste: true,
        };
        assert_eq!(opts.modes(), [TermMode::AltScreen, TermMode::Paste]);
    }

    #[test]
    fn mode_sequences_round_trip() {
        for mode in TermMode::ALL {
            let mut on = Vec::new();
            let mut off = Vec::new();
            mode.enable(&mut on).unwrap();
            mode.disable(&mut off).unwrap();
            assert!(!on.is_empty(), "{} writes nothing", mode.name());
            assert_ne!(on, off);
        }
    }

    #[test]
    fn paste_mode_uses_2004() {
        let mut on = Vec::new();
        TermMode::Paste.enable(&mut on).unwrap();
        assert_eq!(on, b"\x1b[?2004h");
    }
}
