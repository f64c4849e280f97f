//! # NoteList Component
//!
//! The browsing screen: every note under the root, narrowed by the filter.
//! The selection comes from core `Browser`; `ListState` only keeps the
//! scroll offset between frames.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::state::Browser;
use crate::tui::component::Component;
use crate::tui::theme::Theme;

/// Width of the `[pdf] ` tag column.
const TAG_WIDTH: usize = 6;

pub struct NoteList<'a> {
    pub browser: &'a Browser,
    pub list_state: &'a mut ListState,
    pub theme: &'a Theme,
}

impl Component for NoteList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let browser = self.browser;
        let show_filter = browser.filtering || !browser.filter.is_empty();
        let [filter_area, list_area] = if show_filter {
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area)
        } else {
            [Rect::default(), area]
        };

        if show_filter {
            let mut spans = vec![
                Span::styled("/", Style::default().fg(self.theme.accent)),
                Span::raw(browser.filter.clone()),
            ];
            if browser.filtering {
                spans.push(Span::styled("▏", Style::default().fg(self.theme.accent)));
            }
            frame.render_widget(Line::from(spans), filter_area);
        }

        let empty_message = if !browser.scanned {
            Some("Scanning…".to_string())
        } else if browser.notes.is_empty() {
            Some(format!(
                "No .md or .pdf files found in '{}'",
                browser.root.display()
            ))
        } else if browser.visible().is_empty() {
            Some(format!("No notes match '{}'", browser.filter))
        } else {
            None
        };
        if let Some(message) = empty_message {
            let empty = Paragraph::new(message)
                .style(self.theme.hint())
                .alignment(Alignment::Center);
            frame.render_widget(empty, list_area);
            return;
        }

        let path_width = (list_area.width as usize).saturating_sub(TAG_WIDTH);
        let items: Vec<ListItem> = browser
            .visible()
            .into_iter()
            .map(|note| {
                let label = format!("[{}]", note.kind.label());
                let tag = format!("{:<width$}", label, width = TAG_WIDTH);
                ListItem::new(Line::from(vec![
                    Span::styled(tag, self.theme.hint()),
                    Span::raw(truncate_str(&note.display_path(&browser.root), path_width)),
                ]))
            })
            .collect();

        self.list_state.select(browser.selection);
        let list = List::new(items).highlight_style(self.theme.selection);
        frame.render_stateful_widget(list, list_area, self.list_state);
    }
}

/// Truncate to `max_width` display columns, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}
