//! Terminal-independent key events.
//!
//! The TUI converts crossterm key events into [`InputKey`] so that the state
//! machine in this crate never depends on a terminal library.

/// Abstract key press, converted from crossterm at the TUI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+c, Ctrl+s...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,

    /// Function key (F1-F12)
    F(u8),
}

impl InputKey {
    /// Character the key types into a text field, if any.
    pub fn typed_char(&self) -> Option<char> {
        match self {
            InputKey::Char(c) => Some(*c),
            _ => None,
        }
    }
}
