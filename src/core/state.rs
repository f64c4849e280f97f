//! # Application State
//!
//! Core state for Puntes. Domain types only; presentation state lives in
//! the `tui` module.
//!
//! ```text
//! App
//! ├── state: AppState            // which screen we're on (exactly one)
//! │   ├── AwaitingConfig
//! │   ├── PromptingForPath { input }
//! │   ├── Browsing(Browser)      // notes, selection, filter
//! │   ├── Viewing(Viewer)        // Browser + rendered note + scroll
//! │   └── Fatal(AppError)        // terminal
//! ├── config: Option<Config>     // loaded notes_path
//! ├── viewport: Viewport         // content area size
//! ├── notice: Option<Notice>     // one-line status / inline error
//! └── in_flight: InFlight        // outstanding command per slot
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::error::AppError;
use crate::core::render::StyledText;
use crate::core::scanner::NoteRef;

// ============================================================================
// Screens
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    AwaitingConfig,
    PromptingForPath { input: String },
    Browsing(Browser),
    Viewing(Viewer),
    Fatal(AppError),
}

impl AppState {
    pub fn name(&self) -> &'static str {
        match self {
            AppState::AwaitingConfig => "AwaitingConfig",
            AppState::PromptingForPath { .. } => "PromptingForPath",
            AppState::Browsing(_) => "Browsing",
            AppState::Viewing(_) => "Viewing",
            AppState::Fatal(_) => "Fatal",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, AppState::Fatal(_))
    }
}

/// The note list: everything found under `root`, narrowed by `filter`.
///
/// `selection` indexes into the *visible* (filtered) list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    pub root: PathBuf,
    pub notes: Vec<NoteRef>,
    /// False until the first scan result arrives.
    pub scanned: bool,
    pub selection: Option<usize>,
    pub filter: String,
    /// True while keystrokes go into the filter instead of navigation.
    pub filtering: bool,
}

impl Browser {
    /// A browser whose scan is still in flight.
    pub fn pending(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            notes: Vec::new(),
            scanned: false,
            selection: None,
            filter: String::new(),
            filtering: false,
        }
    }

    pub fn populate(&mut self, notes: Vec<NoteRef>) {
        self.notes = notes;
        self.scanned = true;
        self.selection = None;
        self.clamp_selection();
    }

    /// Notes whose file name contains the filter, case-insensitively.
    pub fn visible(&self) -> Vec<&NoteRef> {
        if self.filter.is_empty() {
            return self.notes.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.file_name().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected_note(&self) -> Option<&NoteRef> {
        let index = self.selection?;
        self.visible().get(index).copied()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.clamp_selection();
    }

    /// Move the selection by `delta` rows, stopping at either end.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selection = None;
            return;
        }
        let current = self.selection.unwrap_or(0) as isize;
        let target = (current + delta).clamp(0, len as isize - 1);
        self.selection = Some(target as usize);
    }

    pub fn select_first(&mut self) {
        self.selection = (!self.visible().is_empty()).then_some(0);
    }

    pub fn select_last(&mut self) {
        self.selection = self.visible().len().checked_sub(1);
    }

    /// Keep `selection` inside the visible list (first item if unset).
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selection = match len {
            0 => None,
            _ => Some(self.selection.unwrap_or(0).min(len - 1)),
        };
    }
}

/// A rendered Markdown note on screen, plus the list to return to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub browser: Browser,
    pub note: NoteRef,
    pub content: StyledText,
    /// Index of the first visible line.
    pub scroll: usize,
}

impl Viewer {
    pub fn max_scroll(&self, viewport_height: u16) -> usize {
        self.content
            .lines
            .len()
            .saturating_sub(viewport_height as usize)
    }

    pub fn scroll_by(&mut self, delta: isize, viewport_height: u16) {
        let max = self.max_scroll(viewport_height) as isize;
        self.scroll = (self.scroll as isize + delta).clamp(0, max) as usize;
    }

    pub fn scroll_to_end(&mut self, viewport_height: u16) {
        self.scroll = self.max_scroll(viewport_height);
    }

    pub fn clamp_scroll(&mut self, viewport_height: u16) {
        self.scroll = self.scroll.min(self.max_scroll(viewport_height));
    }
}

// ============================================================================
// Viewport & notices
// ============================================================================

/// Size of the area notes are drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown under the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

// ============================================================================
// In-flight commands
// ============================================================================

/// Independent lanes of async work. At most one command per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Config,
    Scan,
    Content,
}

/// Identifies one dispatched command. Results carry it back so stale ones
/// (cancelled or superseded) can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct InFlight {
    next_generation: u64,
    active: HashMap<Slot, u64>,
}

impl InFlight {
    /// Claim `slot`. Returns `None` if a command is already outstanding there.
    pub fn begin(&mut self, slot: Slot) -> Option<Ticket> {
        if self.active.contains_key(&slot) {
            return None;
        }
        self.next_generation += 1;
        self.active.insert(slot, self.next_generation);
        Some(Ticket {
            slot,
            generation: self.next_generation,
        })
    }

    /// Release the slot if `ticket` is its current command.
    /// Returns false for stale tickets, whose results must be ignored.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.active.get(&ticket.slot) == Some(&ticket.generation) {
            self.active.remove(&ticket.slot);
            true
        } else {
            debug!("Discarding stale result for {:?}", ticket);
            false
        }
    }

    /// Drop the outstanding command in `slot`, if any.
    pub fn cancel(&mut self, slot: Slot) -> bool {
        self.active.remove(&slot).is_some()
    }

    pub fn is_busy(&self, slot: Slot) -> bool {
        self.active.contains_key(&slot)
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub state: AppState,
    pub config: Option<Config>,
    pub viewport: Viewport,
    pub notice: Option<Notice>,
    pub in_flight: InFlight,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::AwaitingConfig,
            config: None,
            viewport: Viewport::default(),
            notice: None,
            in_flight: InFlight::default(),
        }
    }
}
