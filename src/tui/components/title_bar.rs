//! # TitleBar Component
//!
//! Top line: app name, where you are, and a busy marker while a command
//! is outstanding.
//!
//! 1. **Busy**: `"Puntes | ~/notes | working…"`
//! 2. **Location**: `"Puntes | ~/notes"`
//! 3. **Default**: `"Puntes"`

use crate::tui::component::Component;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    /// Notes root or note path; empty before the config is known.
    pub location: String,
    pub busy: bool,
    pub theme: &'a Theme,
}

impl<'a> TitleBar<'a> {
    pub fn new(location: String, busy: bool, theme: &'a Theme) -> Self {
        Self {
            location,
            busy,
            theme,
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("Puntes", self.theme.title())];
        if !self.location.is_empty() {
            spans.push(Span::styled(" | ", self.theme.hint()));
            spans.push(Span::raw(self.location.clone()));
        }
        if self.busy {
            spans.push(Span::styled(" | ", self.theme.hint()));
            spans.push(Span::styled("working…", self.theme.hint()));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
