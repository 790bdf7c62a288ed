#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Everything the form reacts to arrives as an [`Event`]: key presses,
//! mouse clicks, bracketed pastes, and terminal resizes. Backends translate
//! their native events into these types (see [`Event::from_crossterm`]);
//! tests construct them directly.

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event.
    Mouse(MouseEvent),

    /// Text delivered atomically by bracketed paste.
    Paste(String),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },

    /// Focus gained (`true`) or lost (`false`).
    Focus(bool),
}

impl Event {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// A single printable character press.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// A left-button press at the given cell.
    #[must_use]
    pub const fn left_click(x: u16, y: u16) -> Self {
        Self::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y))
    }

    /// Convert a Crossterm event into an [`Event`].
    ///
    /// Returns `None` for keys the form has no use for (media keys,
    /// modifier-only presses, lock keys).
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key_event(key).map(Event::Key),
            cte::Event::Mouse(mouse) => map_mouse_event(mouse).map(Event::Mouse),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            cte::Event::Paste(text) => Some(Event::Paste(text)),
            cte::Event::FocusGained => Some(Event::Focus(true)),
            cte::Event::FocusLost => Some(Event::Focus(false)),
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a press event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Release events are ignored by every widget; presses and repeats edit.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }
}

/// Key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab.
    BackTab,
    Delete,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when the terminal cannot tell).
    #[default]
    Press,
    /// Key is being held.
    Repeat,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event. Coordinates are 0-indexed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// True for a primary-button press, the only mouse action the form uses.
    #[must_use]
    pub const fn is_left_down(&self) -> bool {
        matches!(self.kind, MouseEventKind::Down(MouseButton::Left))
    }
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    let kind = match event.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
        kind,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Esc => Some(KeyCode::Escape),
        cte::KeyCode::Backspace => Some(KeyCode::Backspace),
        cte::KeyCode::Tab => Some(KeyCode::Tab),
        cte::KeyCode::BackTab => Some(KeyCode::BackTab),
        cte::KeyCode::Delete => Some(KeyCode::Delete),
        cte::KeyCode::Home => Some(KeyCode::Home),
        cte::KeyCode::End => Some(KeyCode::End),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::PageUp => Some(KeyCode::PageUp),
        cte::KeyCode::PageDown => Some(KeyCode::PageDown),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(cte::KeyModifiers::SUPER) {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(not(target_arch = "wasm32"))]
fn map_mouse_event(event: cte::MouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        cte::MouseEventKind::Down(button) => MouseEventKind::Down(map_mouse_button(button)),
        cte::MouseEventKind::Up(button) => MouseEventKind::Up(map_mouse_button(button)),
        cte::MouseEventKind::Drag(button) => MouseEventKind::Drag(map_mouse_button(button)),
        cte::MouseEventKind::Moved => MouseEventKind::Moved,
        cte::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        cte::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        cte::MouseEventKind::ScrollLeft | cte::MouseEventKind::ScrollRight => return None,
    };
    Some(
        MouseEvent::new(kind, event.column, event.row)
            .with_modifiers(map_modifiers(event.modifiers)),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn map_mouse_button(button: cte::MouseButton) -> MouseButton {
    match button {
        cte::MouseButton::Left => MouseButton::Left,
        cte::MouseButton::Right => MouseButton::Right,
        cte::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crossterm::event as ct_event;

    fn ct_key(code: ct_event::KeyCode, modifiers: ct_event::KeyModifiers) -> ct_event::Event {
        ct_event::Event::Key(ct_event::KeyEvent {
            code,
            modifiers,
            kind: ct_event::KeyEventKind::Press,
            state: ct_event::KeyEventState::NONE,
        })
    }

    #[test]
    fn char_constructor_is_plain_press() {
        let Event::Key(key) = Event::char('a') else {
            panic!("expected key event");
        };
        assert!(key.is_char('a'));
        assert_eq!(key.modifiers, Modifiers::NONE);
        assert!(key.is_actionable());
    }

    #[test]
    fn release_is_not_actionable() {
        let key = KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Release);
        assert!(!key.is_actionable());
        let repeat = KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Repeat);
        assert!(repeat.is_actionable());
    }

    #[test]
    fn modifier_helpers() {
        let key = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(key.ctrl());
        assert!(!key.alt());
        assert!(!key.shift());
    }

    #[test]
    fn left_click_constructor() {
        let Event::Mouse(mouse) = Event::left_click(4, 7) else {
            panic!("expected mouse event");
        };
        assert!(mouse.is_left_down());
        assert_eq!(mouse.position(), (4, 7));
    }

    #[test]
    fn map_crossterm_char_with_ctrl() {
        let mapped = Event::from_crossterm(ct_key(
            ct_event::KeyCode::Char('x'),
            ct_event::KeyModifiers::CONTROL,
        ));
        let Some(Event::Key(key)) = mapped else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::Char('x'));
        assert!(key.ctrl());
    }

    #[test]
    fn map_crossterm_escape_and_backtab() {
        assert_eq!(
            Event::from_crossterm(ct_key(ct_event::KeyCode::Esc, ct_event::KeyModifiers::NONE)),
            Some(Event::key(KeyCode::Escape))
        );
        let mapped = Event::from_crossterm(ct_key(
            ct_event::KeyCode::BackTab,
            ct_event::KeyModifiers::SHIFT,
        ));
        let Some(Event::Key(key)) = mapped else {
            panic!("expected key event");
        };
        assert_eq!(key.code, KeyCode::BackTab);
        assert!(key.shift());
    }

    #[test]
    fn map_crossterm_paging_keys() {
        assert_eq!(
            Event::from_crossterm(ct_key(ct_event::KeyCode::PageDown, ct_event::KeyModifiers::NONE)),
            Some(Event::key(KeyCode::PageDown))
        );
        assert_eq!(
            Event::from_crossterm(ct_key(ct_event::KeyCode::PageUp, ct_event::KeyModifiers::NONE)),
            Some(Event::key(KeyCode::PageUp))
        );
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(
            Event::from_crossterm(ct_key(ct_event::KeyCode::F(5), ct_event::KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn map_crossterm_mouse_down() {
        let event = ct_event::Event::Mouse(ct_event::MouseEvent {
            kind: ct_event::MouseEventKind::Down(ct_event::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: ct_event::KeyModifiers::NONE,
        });
        assert_eq!(Event::from_crossterm(event), Some(Event::left_click(10, 5)));
    }

    #[test]
    fn map_crossterm_horizontal_scroll_is_dropped() {
        let event = ct_event::Event::Mouse(ct_event::MouseEvent {
            kind: ct_event::MouseEventKind::ScrollLeft,
            column: 0,
            row: 0,
            modifiers: ct_event::KeyModifiers::NONE,
        });
        assert_eq!(Event::from_crossterm(event), None);
    }

    #[test]
    fn map_crossterm_paste_resize_focus() {
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Paste("hi".into())),
            Some(Event::Paste("hi".into()))
        );
        assert_eq!(
            Event::from_crossterm(ct_event::Event::Resize(80, 24)),
            Some(Event::Resize {
                width: 80,
                height: 24
            })
        );
        assert_eq!(
            Event::from_crossterm(ct_event::Event::FocusLost),
            Some(Event::Focus(false))
        );
    }
}
