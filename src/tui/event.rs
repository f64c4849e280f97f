use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::core::action::Input;

/// Terminal events the run loop cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Keyboard input, including pastes.
    Input(Input),
    /// Mouse wheel, already mapped to the matching arrow.
    Scroll(Input),
    /// New terminal size (columns, rows).
    Resize(u16, u16),
}

impl TuiEvent {
    /// Whether this event dismisses the fatal error screen. Only the
    /// keyboard does; a stray wheel tick or resize must not.
    pub fn acknowledges_fatal(&self) -> bool {
        matches!(self, TuiEvent::Input(_))
    }
}

/// Poll for an event with timeout (blocks up to 100ms)
pub fn poll_event() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::from_millis(100))
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => translate_key(key).map(TuiEvent::Input),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::Scroll(Input::Up)),
            MouseEventKind::ScrollDown => Some(TuiEvent::Scroll(Input::Down)),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Input(Input::Paste(data))),
        Event::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::trace!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Input::Interrupt),
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => None,
        (_, KeyCode::Char(c)) => Some(Input::Char(c)),
        (_, KeyCode::Backspace) => Some(Input::Backspace),
        (_, KeyCode::Enter) => Some(Input::Enter),
        (_, KeyCode::Esc) => Some(Input::Escape),
        (_, KeyCode::Up) => Some(Input::Up),
        (_, KeyCode::Down) => Some(Input::Down),
        (_, KeyCode::PageUp) => Some(Input::PageUp),
        (_, KeyCode::PageDown) => Some(Input::PageDown),
        (_, KeyCode::Home) => Some(Input::Home),
        (_, KeyCode::End) => Some(Input::End),
        _ => None,
    }
}
