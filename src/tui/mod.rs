//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core `Action` values.
//!
//! This is the only module that knows about ratatui and crossterm, apart
//! from the `StyledText` type notes are rendered into.
//!
//! ## Loop
//!
//! Each iteration draws (only when something changed), waits up to 100ms
//! for terminal input, drains all pending input, then drains results from
//! the executor. Every action goes through `core::action::update`, and the
//! returned `Effect` is applied here: spawning a command, aborting one, or
//! quitting.
//!
//! Once the app is `Fatal` the error screen stays up until a key is pressed.

mod component;
mod components;
mod event;
pub mod markdown;
pub mod theme;
mod ui;

use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::sync::{Arc, mpsc};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ConfigStore;
use crate::core::error::AppError;
use crate::core::executor::Executor;
use crate::core::state::{App, AppState, Slot};
use crate::tui::event::{TuiEvent, poll_event, poll_event_immediate};
use crate::tui::markdown::MarkdownRenderer;
use crate::tui::theme::Theme;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    /// The error that stopped the app, for the caller to report once the
    /// terminal is restored.
    Fatal(AppError),
}

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    /// Scroll offset of the note list between frames.
    pub list_state: ListState,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Tasks the executor is running, one per slot at most.
#[derive(Default)]
struct Tasks {
    handles: HashMap<Slot, AbortHandle>,
}

impl Tasks {
    fn apply(&mut self, effect: Effect, executor: &Executor) -> Option<Outcome> {
        match effect {
            Effect::None => {}
            Effect::Quit => return Some(Outcome::Quit),
            Effect::Spawn(dispatch) => {
                let slot = dispatch.ticket.slot;
                let handle = executor.spawn(dispatch);
                // The previous task in this slot has already reported
                if let Some(previous) = self.handles.insert(slot, handle) {
                    previous.abort();
                }
            }
            Effect::Cancel(slot) => {
                if let Some(handle) = self.handles.remove(&slot) {
                    info!("Aborting {:?} task", slot);
                    handle.abort();
                }
            }
        }
        None
    }

    fn abort_all(&mut self) {
        for (slot, handle) in self.handles.drain() {
            if !handle.is_finished() {
                debug!("Aborting {:?} task on exit", slot);
                handle.abort();
            }
        }
    }
}

/// Run the app until the user quits or a fatal error is acknowledged.
///
/// Must be called from within a tokio runtime.
pub fn run(store: ConfigStore) -> io::Result<Outcome> {
    let theme = Theme::default();
    let (tx, rx) = mpsc::channel();
    let executor = Executor::new(store, Arc::new(MarkdownRenderer::new(&theme)), tx);

    let mut app = App::new();
    let mut tui = TuiState::default();
    let mut tasks = Tasks::default();

    let mut terminal = ratatui::init();
    let guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {}", e);
            None
        }
    };

    let result = event_loop(
        &mut terminal,
        &mut app,
        &mut tui,
        &theme,
        &executor,
        &mut tasks,
        &rx,
    );

    tasks.abort_all();
    drop(guard);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    theme: &Theme,
    executor: &Executor,
    tasks: &mut Tasks,
    rx: &mpsc::Receiver<Action>,
) -> io::Result<Outcome> {
    let size = terminal.size()?;
    update(app, resize_action(size.width, size.height));
    if let Some(outcome) = tasks.apply(update(app, Action::Start), executor) {
        return Ok(outcome);
    }

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui, theme))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let mut pending = poll_event()?;
        while let Some(event) = pending {
            needs_redraw = true;
            if let AppState::Fatal(error) = &app.state
                && event.acknowledges_fatal()
            {
                info!("Exiting after fatal error: {}", error);
                return Ok(Outcome::Fatal(error.clone()));
            }
            let action = match event {
                TuiEvent::Input(input) | TuiEvent::Scroll(input) => Action::Input(input),
                TuiEvent::Resize(cols, rows) => resize_action(cols, rows),
            };
            if let Some(outcome) = tasks.apply(update(app, action), executor) {
                info!("Quit requested");
                return Ok(outcome);
            }
            pending = poll_event_immediate()?;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {}", action.name());
            if let Some(outcome) = tasks.apply(update(app, action), executor) {
                return Ok(outcome);
            }
        }

        if app.state.is_fatal() {
            tasks.abort_all();
        }
    }
}

/// Translate a terminal size into the note area size the core tracks.
fn resize_action(cols: u16, rows: u16) -> Action {
    let (width, height) = ui::content_size(Rect::new(0, 0, cols, rows));
    Action::Resize { width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_reports_content_area() {
        assert_eq!(
            resize_action(100, 40),
            Action::Resize {
                width: 99,
                height: 38
            }
        );
    }
}
