//! # Actions
//!
//! Everything that can happen in Puntes becomes an `Action`.
//! User presses Enter? That's `Action::Input(Input::Enter)`.
//! A scan finishes? That's `Action::NotesScanned(ticket, result)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect`. It performs no I/O: work that touches
//! the filesystem or spawns processes is described as a `Command` inside
//! `Effect::Spawn`, and the executor turns it into exactly one result action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                              │
//!             Action::*Loaded/Scanned/...  ◄── executor
//! ```

use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;

use crate::core::config::{Config, ConfigError, normalize_entered_path};
use crate::core::error::AppError;
use crate::core::loader::LoadError;
use crate::core::render::{RenderError, StyledText};
use crate::core::scanner::{NoteKind, NoteRef, ScanError};
use crate::core::state::{App, AppState, Browser, Notice, Slot, Ticket, Viewer, Viewport};

/// Keyboard input, already decoded from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Paste(String),
    Backspace,
    Enter,
    Escape,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Ctrl+C: leave from any non-fatal state.
    Interrupt,
}

/// A side effect for the executor to run off the UI loop.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    LoadConfig,
    SaveConfig(Config),
    Scan(PathBuf),
    ReadNote(NoteRef),
    RenderNote {
        note: NoteRef,
        bytes: Vec<u8>,
        width: u16,
    },
    OpenNote(NoteRef),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LoadConfig => write!(f, "LoadConfig"),
            Command::SaveConfig(config) => write!(f, "SaveConfig({:?})", config.notes_path),
            Command::Scan(root) => write!(f, "Scan({})", root.display()),
            Command::ReadNote(note) => write!(f, "ReadNote({})", note.path.display()),
            // Note bodies can be megabytes; log the size only
            Command::RenderNote { note, bytes, width } => write!(
                f,
                "RenderNote({}, {} bytes, width {})",
                note.path.display(),
                bytes.len(),
                width
            ),
            Command::OpenNote(note) => write!(f, "OpenNote({})", note.path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Input(Input),
    /// New size of the note content area.
    Resize {
        width: u16,
        height: u16,
    },
    ConfigLoaded(Ticket, Result<Option<Config>, ConfigError>),
    ConfigSaved(Ticket, Result<(), ConfigError>),
    NotesScanned(Ticket, Result<Vec<NoteRef>, ScanError>),
    NoteRead {
        ticket: Ticket,
        note: NoteRef,
        result: Result<Vec<u8>, LoadError>,
    },
    NoteRendered {
        ticket: Ticket,
        note: NoteRef,
        result: Result<StyledText, RenderError>,
    },
    NoteOpened {
        ticket: Ticket,
        note: NoteRef,
        result: Result<(), LoadError>,
    },
}

/// What the event loop must do after `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Spawn(Dispatch),
    /// Abort the task running in this slot; its result will be ignored.
    Cancel(Slot),
}

/// Apply `action` to `app`. The only place `AppState` changes.
pub fn update(app: &mut App, action: Action) -> Effect {
    if let AppState::Fatal(error) = &app.state {
        debug!("Ignoring {:?} in Fatal state ({})", action.name(), error);
        return Effect::None;
    }

    match action {
        Action::Start if matches!(app.state, AppState::AwaitingConfig) => {
            dispatch(app, Slot::Config, Command::LoadConfig)
        }
        Action::Start => Effect::None,
        Action::Resize { width, height } => {
            app.viewport = Viewport { width, height };
            if let AppState::Viewing(viewer) = &mut app.state {
                viewer.clamp_scroll(height);
            }
            Effect::None
        }
        Action::Input(input) => handle_input(app, input),
        Action::ConfigLoaded(ticket, result) => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            config_loaded(app, result)
        }
        Action::ConfigSaved(ticket, result) => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            match result {
                Ok(()) => {
                    app.notice = None;
                    transition(app, AppState::AwaitingConfig);
                    dispatch(app, Slot::Config, Command::LoadConfig)
                }
                Err(e) => fail(app, e.into()),
            }
        }
        Action::NotesScanned(ticket, result) => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            let notes = match result {
                Ok(notes) => notes,
                Err(e) => return fail(app, e.into()),
            };
            match &mut app.state {
                AppState::Browsing(browser) => browser.populate(notes),
                state => warn!("Scan finished outside Browsing ({}), dropping", state.name()),
            }
            Effect::None
        }
        Action::NoteRead {
            ticket,
            note,
            result,
        } => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            match result {
                Ok(bytes) => {
                    let width = app.viewport.width;
                    dispatch(app, Slot::Content, Command::RenderNote { note, bytes, width })
                }
                Err(e) => note_failed(app, e.into()),
            }
        }
        Action::NoteRendered {
            ticket,
            note,
            result,
        } => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            match result {
                Ok(content) => {
                    open_viewer(app, note, content);
                    Effect::None
                }
                Err(e) => note_failed(app, e.into()),
            }
        }
        Action::NoteOpened {
            ticket,
            note,
            result,
        } => {
            if !app.in_flight.finish(ticket) {
                return Effect::None;
            }
            match result {
                Ok(()) => {
                    app.notice = Some(Notice::info(format!(
                        "Opened {} in the default viewer",
                        note.file_name()
                    )));
                    Effect::None
                }
                Err(e) => note_failed(app, e.into()),
            }
        }
    }
}

// ── Transitions ─────────────────────────────────────────────────────────────

fn transition(app: &mut App, next: AppState) {
    if app.state.name() != next.name() {
        info!("State: {} -> {}", app.state.name(), next.name());
    }
    app.state = next;
}

fn fail(app: &mut App, error: AppError) -> Effect {
    warn!("Fatal {:?}: {}", error.kind(), error);
    transition(app, AppState::Fatal(error));
    Effect::None
}

/// A single note failed. Recoverable kinds become an inline notice.
fn note_failed(app: &mut App, error: AppError) -> Effect {
    if !error.is_recoverable() {
        return fail(app, error);
    }
    warn!("{:?}: {}", error.kind(), error);
    app.notice = Some(Notice::error(error.to_string()));
    Effect::None
}

fn dispatch(app: &mut App, slot: Slot, command: Command) -> Effect {
    match app.in_flight.begin(slot) {
        Some(ticket) => {
            debug!("Dispatching {:?} as {:?}", command, ticket);
            Effect::Spawn(Dispatch { ticket, command })
        }
        None => {
            debug!("{:?} busy, not dispatching {:?}", slot, command);
            Effect::None
        }
    }
}

fn config_loaded(app: &mut App, result: Result<Option<Config>, ConfigError>) -> Effect {
    if !matches!(app.state, AppState::AwaitingConfig) {
        warn!("Config loaded outside AwaitingConfig ({}), dropping", app.state.name());
        return Effect::None;
    }
    match result {
        Ok(Some(config)) => {
            let root = PathBuf::from(&config.notes_path);
            app.config = Some(config);
            transition(app, AppState::Browsing(Browser::pending(root.clone())));
            dispatch(app, Slot::Scan, Command::Scan(root))
        }
        Ok(None) => {
            transition(
                app,
                AppState::PromptingForPath {
                    input: String::new(),
                },
            );
            Effect::None
        }
        Err(e) => fail(app, e.into()),
    }
}

fn open_viewer(app: &mut App, note: NoteRef, content: StyledText) {
    let state = std::mem::replace(&mut app.state, AppState::AwaitingConfig);
    match state {
        AppState::Browsing(browser) => {
            app.notice = None;
            let mut viewer = Viewer {
                browser,
                note,
                content,
                scroll: 0,
            };
            viewer.clamp_scroll(app.viewport.height);
            transition(app, AppState::Viewing(viewer));
        }
        other => {
            warn!("Rendered note outside Browsing ({}), dropping", other.name());
            app.state = other;
        }
    }
}

fn close_viewer(app: &mut App) {
    let state = std::mem::replace(&mut app.state, AppState::AwaitingConfig);
    match state {
        AppState::Viewing(viewer) => transition(app, AppState::Browsing(viewer.browser)),
        other => app.state = other,
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

fn handle_input(app: &mut App, input: Input) -> Effect {
    if input == Input::Interrupt {
        info!("Interrupted in {}", app.state.name());
        return Effect::Quit;
    }

    match &app.state {
        AppState::AwaitingConfig => match input {
            Input::Char('q') | Input::Escape => Effect::Quit,
            _ => Effect::None,
        },
        AppState::PromptingForPath { .. } => prompt_input(app, input),
        AppState::Browsing(_) => browse_input(app, input),
        AppState::Viewing(_) => view_input(app, input),
        AppState::Fatal(_) => Effect::None,
    }
}

fn prompt_input(app: &mut App, input: Input) -> Effect {
    let AppState::PromptingForPath { input: buffer } = &mut app.state else {
        return Effect::None;
    };

    match input {
        Input::Char(c) => buffer.push(c),
        Input::Paste(text) => buffer.extend(text.chars().filter(|c| !c.is_control())),
        Input::Backspace => {
            buffer.pop();
        }
        Input::Escape => return Effect::Quit,
        Input::Enter => {
            let Some(path) = normalize_entered_path(buffer) else {
                app.notice = Some(Notice::error("Enter the full path to your notes folder"));
                return Effect::None;
            };
            app.notice = Some(Notice::info(format!("Saving {path}")));
            return dispatch(app, Slot::Config, Command::SaveConfig(Config::new(path)));
        }
        _ => {}
    }
    Effect::None
}

const PAGE: isize = 10;

fn browse_input(app: &mut App, input: Input) -> Effect {
    let content_busy = app.in_flight.is_busy(Slot::Content);
    let AppState::Browsing(browser) = &mut app.state else {
        return Effect::None;
    };

    if browser.filtering {
        match input {
            Input::Char(c) => browser.push_filter_char(c),
            Input::Paste(text) => {
                let pasted: String = text.trim().chars().filter(|c| !c.is_control()).collect();
                let filter = format!("{}{}", browser.filter, pasted);
                browser.set_filter(filter);
            }
            Input::Backspace => browser.pop_filter_char(),
            Input::Enter => browser.filtering = false,
            Input::Escape => {
                browser.filtering = false;
                browser.set_filter("");
            }
            Input::Up => browser.move_selection(-1),
            Input::Down => browser.move_selection(1),
            _ => {}
        }
        return Effect::None;
    }

    match input {
        Input::Char('q') => return Effect::Quit,
        Input::Char('/') => {
            browser.filtering = true;
            app.notice = None;
        }
        Input::Up | Input::Char('k') => browser.move_selection(-1),
        Input::Down | Input::Char('j') => browser.move_selection(1),
        Input::PageUp => browser.move_selection(-PAGE),
        Input::PageDown => browser.move_selection(PAGE),
        Input::Home | Input::Char('g') => browser.select_first(),
        Input::End | Input::Char('G') => browser.select_last(),
        Input::Escape if content_busy => {
            app.in_flight.cancel(Slot::Content);
            app.notice = Some(Notice::info("Cancelled"));
            return Effect::Cancel(Slot::Content);
        }
        Input::Escape => {
            browser.set_filter("");
            app.notice = None;
        }
        Input::Enter => {
            let Some(note) = browser.selected_note().cloned() else {
                return Effect::None;
            };
            if content_busy {
                debug!("Content slot busy, ignoring Enter on {}", note.path.display());
                return Effect::None;
            }
            app.notice = Some(Notice::info(format!("Opening {}", note.file_name())));
            let command = match note.kind {
                NoteKind::Markdown => Command::ReadNote(note),
                NoteKind::Pdf => Command::OpenNote(note),
            };
            return dispatch(app, Slot::Content, command);
        }
        _ => {}
    }
    Effect::None
}

fn view_input(app: &mut App, input: Input) -> Effect {
    let height = app.viewport.height;
    let AppState::Viewing(viewer) = &mut app.state else {
        return Effect::None;
    };
    let page = height.max(1) as isize;

    match input {
        Input::Char('q') | Input::Escape => close_viewer(app),
        Input::Up | Input::Char('k') => viewer.scroll_by(-1, height),
        Input::Down | Input::Char('j') => viewer.scroll_by(1, height),
        Input::PageUp | Input::Char('b') => viewer.scroll_by(-page, height),
        Input::PageDown | Input::Char(' ') => viewer.scroll_by(page, height),
        Input::Char('u') => viewer.scroll_by(-page / 2, height),
        Input::Char('d') => viewer.scroll_by(page / 2, height),
        Input::Home | Input::Char('g') => viewer.scroll = 0,
        Input::End | Input::Char('G') => viewer.scroll_to_end(height),
        _ => {}
    }
    Effect::None
}

impl Action {
    /// Variant name, for logs that must not dump note bodies.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "Start",
            Action::Input(_) => "Input",
            Action::Resize { .. } => "Resize",
            Action::ConfigLoaded(..) => "ConfigLoaded",
            Action::ConfigSaved(..) => "ConfigSaved",
            Action::NotesScanned(..) => "NotesScanned",
            Action::NoteRead { .. } => "NoteRead",
            Action::NoteRendered { .. } => "NoteRendered",
            Action::NoteOpened { .. } => "NoteOpened",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{browser_with, browsing_app, styled_lines};

    fn spawned(effect: Effect) -> Dispatch {
        match effect {
            Effect::Spawn(dispatch) => dispatch,
            other => panic!("expected Spawn, got {:?}", other),
        }
    }

    #[test]
    fn test_start_dispatches_config_load_once() {
        let mut app = App::new();
        let dispatch = spawned(update(&mut app, Action::Start));
        assert_eq!(dispatch.command, Command::LoadConfig);
        assert_eq!(dispatch.ticket.slot, Slot::Config);

        // Config slot still busy: no second load
        assert_eq!(update(&mut app, Action::Start), Effect::None);
        assert_eq!(app.state, AppState::AwaitingConfig);
    }

    #[test]
    fn test_present_config_starts_scan() {
        let mut app = App::new();
        let load = spawned(update(&mut app, Action::Start));

        let scan = spawned(update(
            &mut app,
            Action::ConfigLoaded(load.ticket, Ok(Some(Config::new("/notes")))),
        ));

        assert_eq!(scan.command, Command::Scan(PathBuf::from("/notes")));
        assert_eq!(app.state, AppState::Browsing(Browser::pending("/notes")));
        assert_eq!(app.config, Some(Config::new("/notes")));
    }

    #[test]
    fn test_absent_config_prompts() {
        let mut app = App::new();
        let load = spawned(update(&mut app, Action::Start));
        assert_eq!(update(&mut app, Action::ConfigLoaded(load.ticket, Ok(None))), Effect::None);
        assert_eq!(
            app.state,
            AppState::PromptingForPath {
                input: String::new()
            }
        );
    }

    #[test]
    fn test_corrupt_config_is_fatal() {
        let mut app = App::new();
        let load = spawned(update(&mut app, Action::Start));
        let err = ConfigError::Corrupt {
            path: PathBuf::from("/cfg/config.toml"),
            message: "bad".to_string(),
        };
        update(&mut app, Action::ConfigLoaded(load.ticket, Err(err.clone())));
        assert_eq!(app.state, AppState::Fatal(AppError::Config(err)));
    }

    #[test]
    fn test_prompt_editing() {
        let mut app = App::new();
        app.state = AppState::PromptingForPath {
            input: String::new(),
        };
        for c in "/tmpx".chars() {
            update(&mut app, Action::Input(Input::Char(c)));
        }
        update(&mut app, Action::Input(Input::Backspace));
        update(&mut app, Action::Input(Input::Paste("/n\notes".to_string())));
        assert_eq!(
            app.state,
            AppState::PromptingForPath {
                input: "/tmp/notes".to_string()
            }
        );
    }

    #[test]
    fn test_blank_prompt_is_rejected_in_place() {
        let mut app = App::new();
        app.state = AppState::PromptingForPath {
            input: "   ".to_string(),
        };
        assert_eq!(update(&mut app, Action::Input(Input::Enter)), Effect::None);
        assert!(matches!(app.state, AppState::PromptingForPath { .. }));
        assert_eq!(app.notice.as_ref().unwrap().level, crate::core::state::NoticeLevel::Error);
    }

    #[test]
    fn test_relative_prompt_entry_is_saved_absolute() {
        let mut app = App::new();
        app.state = AppState::PromptingForPath {
            input: "notes".to_string(),
        };
        let save = spawned(update(&mut app, Action::Input(Input::Enter)));
        let Command::SaveConfig(config) = save.command else {
            panic!("expected SaveConfig, got {:?}", save.command);
        };
        assert!(PathBuf::from(&config.notes_path).is_absolute());
        assert!(config.notes_path.ends_with("notes"));
    }

    #[test]
    fn test_save_error_is_fatal() {
        let mut app = App::new();
        app.state = AppState::PromptingForPath {
            input: "/notes".to_string(),
        };
        let save = spawned(update(&mut app, Action::Input(Input::Enter)));
        let err = ConfigError::Io {
            path: PathBuf::from("/cfg"),
            message: "read-only file system".to_string(),
        };
        update(&mut app, Action::ConfigSaved(save.ticket, Err(err)));
        assert_eq!(app.state.name(), "Fatal");
    }

    #[test]
    fn test_scan_error_is_fatal() {
        let mut app = App::new();
        let load = spawned(update(&mut app, Action::Start));
        let scan = spawned(update(
            &mut app,
            Action::ConfigLoaded(load.ticket, Ok(Some(Config::new("/gone")))),
        ));
        let err = ScanError {
            root: PathBuf::from("/gone"),
            message: "No such file or directory".to_string(),
        };
        update(&mut app, Action::NotesScanned(scan.ticket, Err(err)));
        assert!(app.state.is_fatal());
    }

    #[test]
    fn test_fatal_ignores_everything() {
        let mut app = App::new();
        app.state = AppState::Fatal(AppError::Render(RenderError::ZeroWidth));
        let before = app.state.clone();
        for action in [
            Action::Start,
            Action::Input(Input::Char('q')),
            Action::Input(Input::Interrupt),
            Action::Resize {
                width: 10,
                height: 10,
            },
        ] {
            assert_eq!(update(&mut app, action), Effect::None);
        }
        assert_eq!(app.state, before);
        assert_eq!(app.viewport, Viewport::default());
    }

    #[test]
    fn test_interrupt_quits_from_any_live_state() {
        for state in [
            AppState::AwaitingConfig,
            AppState::PromptingForPath {
                input: "x".to_string(),
            },
            AppState::Browsing(browser_with(&["a.md"])),
        ] {
            let mut app = App::new();
            app.state = state;
            assert_eq!(update(&mut app, Action::Input(Input::Interrupt)), Effect::Quit);
        }
    }

    #[test]
    fn test_q_types_into_prompt_but_quits_browsing() {
        let mut app = App::new();
        app.state = AppState::PromptingForPath {
            input: String::new(),
        };
        assert_eq!(update(&mut app, Action::Input(Input::Char('q'))), Effect::None);

        let mut app = browsing_app(&["a.md"]);
        assert_eq!(update(&mut app, Action::Input(Input::Char('q'))), Effect::Quit);
    }

    #[test]
    fn test_filter_mode_captures_keys() {
        let mut app = browsing_app(&["a.md", "ab.md", "b.pdf", "quiz.md"]);
        update(&mut app, Action::Input(Input::Char('/')));
        // `q` is filter text here, not quit
        assert_eq!(update(&mut app, Action::Input(Input::Char('q'))), Effect::None);
        let AppState::Browsing(browser) = &app.state else {
            panic!("expected Browsing");
        };
        assert_eq!(browser.filter, "q");
        assert_eq!(browser.visible().len(), 1);

        update(&mut app, Action::Input(Input::Escape));
        let AppState::Browsing(browser) = &app.state else {
            panic!("expected Browsing");
        };
        assert!(!browser.filtering);
        assert!(browser.filter.is_empty());
        assert_eq!(browser.visible().len(), 4);
    }

    #[test]
    fn test_filter_paste_drops_control_chars() {
        let mut app = browsing_app(&["ab.md", "b.md"]);
        update(&mut app, Action::Input(Input::Char('/')));
        update(&mut app, Action::Input(Input::Paste(" a\nb\t ".to_string())));
        let AppState::Browsing(browser) = &app.state else {
            panic!("expected Browsing");
        };
        assert_eq!(browser.filter, "ab");
        assert_eq!(browser.visible().len(), 1);
    }

    #[test]
    fn test_enter_accepts_filter_without_opening() {
        let mut app = browsing_app(&["a.md", "b.md"]);
        update(&mut app, Action::Input(Input::Char('/')));
        update(&mut app, Action::Input(Input::Char('b')));
        assert_eq!(update(&mut app, Action::Input(Input::Enter)), Effect::None);

        let dispatch = spawned(update(&mut app, Action::Input(Input::Enter)));
        assert_eq!(
            dispatch.command,
            Command::ReadNote(NoteRef::new("/notes/b.md", NoteKind::Markdown))
        );
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        let mut app = browsing_app(&[]);
        assert_eq!(update(&mut app, Action::Input(Input::Enter)), Effect::None);
    }

    #[test]
    fn test_second_enter_while_loading_is_ignored() {
        let mut app = browsing_app(&["a.md", "b.md"]);
        spawned(update(&mut app, Action::Input(Input::Enter)));
        update(&mut app, Action::Input(Input::Down));
        assert_eq!(update(&mut app, Action::Input(Input::Enter)), Effect::None);
    }

    #[test]
    fn test_read_bytes_are_rendered_at_viewport_width() {
        let mut app = browsing_app(&["a.md"]);
        update(
            &mut app,
            Action::Resize {
                width: 72,
                height: 20,
            },
        );
        let read = spawned(update(&mut app, Action::Input(Input::Enter)));
        let note = NoteRef::new("/notes/a.md", NoteKind::Markdown);

        let render = spawned(update(
            &mut app,
            Action::NoteRead {
                ticket: read.ticket,
                note: note.clone(),
                result: Ok(b"# Hi".to_vec()),
            },
        ));
        assert_eq!(render.ticket.slot, Slot::Content);
        assert_eq!(
            render.command,
            Command::RenderNote {
                note,
                bytes: b"# Hi".to_vec(),
                width: 72
            }
        );
    }

    #[test]
    fn test_render_failure_returns_to_browsing_with_notice() {
        let mut app = browsing_app(&["a.md"]);
        let read = spawned(update(&mut app, Action::Input(Input::Enter)));
        let note = NoteRef::new("/notes/a.md", NoteKind::Markdown);
        let render = spawned(update(
            &mut app,
            Action::NoteRead {
                ticket: read.ticket,
                note: note.clone(),
                result: Ok(vec![0xff]),
            },
        ));
        update(
            &mut app,
            Action::NoteRendered {
                ticket: render.ticket,
                note,
                result: Err(RenderError::InvalidUtf8("invalid utf-8 sequence".to_string())),
            },
        );

        assert_eq!(app.state.name(), "Browsing");
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, crate::core::state::NoticeLevel::Error);
        assert!(notice.text.contains("UTF-8"));
        // The slot is free again
        assert!(matches!(
            update(&mut app, Action::Input(Input::Enter)),
            Effect::Spawn(_)
        ));
    }

    #[test]
    fn test_read_failure_returns_to_browsing() {
        let mut app = browsing_app(&["a.md"]);
        let read = spawned(update(&mut app, Action::Input(Input::Enter)));
        let note = NoteRef::new("/notes/a.md", NoteKind::Markdown);
        update(
            &mut app,
            Action::NoteRead {
                ticket: read.ticket,
                note: note.clone(),
                result: Err(LoadError::Read {
                    path: note.path.clone(),
                    message: "permission denied".to_string(),
                }),
            },
        );
        assert_eq!(app.state, AppState::Browsing(browser_with(&["a.md"])));
        assert!(app.notice.unwrap().text.contains("permission denied"));
    }

    #[test]
    fn test_escape_cancels_pending_load_and_drops_late_result() {
        let mut app = browsing_app(&["a.md"]);
        let read = spawned(update(&mut app, Action::Input(Input::Enter)));

        assert_eq!(
            update(&mut app, Action::Input(Input::Escape)),
            Effect::Cancel(Slot::Content)
        );

        let late = update(
            &mut app,
            Action::NoteRead {
                ticket: read.ticket,
                note: NoteRef::new("/notes/a.md", NoteKind::Markdown),
                result: Ok(b"# late".to_vec()),
            },
        );
        assert_eq!(late, Effect::None);
        assert_eq!(app.state.name(), "Browsing");
    }

    #[test]
    fn test_viewing_scroll_and_back() {
        let mut app = browsing_app(&["a.md"]);
        update(
            &mut app,
            Action::Resize {
                width: 80,
                height: 10,
            },
        );
        let read = spawned(update(&mut app, Action::Input(Input::Enter)));
        let note = NoteRef::new("/notes/a.md", NoteKind::Markdown);
        let render = spawned(update(
            &mut app,
            Action::NoteRead {
                ticket: read.ticket,
                note: note.clone(),
                result: Ok(b"body".to_vec()),
            },
        ));
        update(
            &mut app,
            Action::NoteRendered {
                ticket: render.ticket,
                note,
                result: Ok(styled_lines(25)),
            },
        );

        let scroll = |app: &App| match &app.state {
            AppState::Viewing(viewer) => viewer.scroll,
            other => panic!("expected Viewing, got {}", other.name()),
        };
        assert_eq!(scroll(&app), 0);
        update(&mut app, Action::Input(Input::PageDown));
        assert_eq!(scroll(&app), 10);
        update(&mut app, Action::Input(Input::End));
        assert_eq!(scroll(&app), 15);
        update(&mut app, Action::Input(Input::Down));
        assert_eq!(scroll(&app), 15);

        // Growing the viewport pulls the offset back into range
        update(
            &mut app,
            Action::Resize {
                width: 80,
                height: 20,
            },
        );
        assert_eq!(scroll(&app), 5);

        update(&mut app, Action::Input(Input::Home));
        assert_eq!(scroll(&app), 0);

        update(&mut app, Action::Input(Input::Char('q')));
        assert_eq!(app.state, AppState::Browsing(browser_with(&["a.md"])));
    }

    #[test]
    fn test_resize_keeps_variant() {
        let mut app = browsing_app(&["a.md"]);
        update(
            &mut app,
            Action::Resize {
                width: 40,
                height: 12,
            },
        );
        assert_eq!(app.state.name(), "Browsing");
        assert_eq!(
            app.viewport,
            Viewport {
                width: 40,
                height: 12
            }
        );
    }
}
