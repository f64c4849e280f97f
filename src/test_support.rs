//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::Path;

use ratatui::text::{Line, Text};

use crate::core::render::{RenderError, Renderer, StyledText};
use crate::core::scanner::{NoteKind, NoteRef};
use crate::core::state::{App, AppState, Browser};

/// Renders markdown verbatim, one `Line` per source line.
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, markdown: &str, _width: u16) -> Result<StyledText, RenderError> {
        Ok(Text::from(
            markdown
                .lines()
                .map(|line| Line::from(line.to_owned()))
                .collect::<Vec<_>>(),
        ))
    }
}

/// A scanned browser over `/notes/<name>` for each name, first item selected.
pub fn browser_with(names: &[&str]) -> Browser {
    let mut browser = Browser::pending("/notes");
    browser.populate(
        names
            .iter()
            .map(|name| {
                let path = format!("/notes/{name}");
                let kind = NoteKind::from_path(Path::new(&path)).unwrap_or(NoteKind::Markdown);
                NoteRef::new(path, kind)
            })
            .collect(),
    );
    browser
}

/// An app already sitting in `Browsing` with a finished scan.
pub fn browsing_app(names: &[&str]) -> App {
    let mut app = App::new();
    app.state = AppState::Browsing(browser_with(names));
    app
}

/// `count` lines of filler content.
pub fn styled_lines(count: usize) -> StyledText {
    Text::from(
        (0..count)
            .map(|i| Line::from(format!("line {i}")))
            .collect::<Vec<_>>(),
    )
}
