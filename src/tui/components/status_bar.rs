//! Bottom line: the current notice, or key hints when there is none.

use crate::core::state::{Notice, NoticeLevel};
use crate::tui::component::Component;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub struct StatusBar<'a> {
    pub notice: Option<&'a Notice>,
    pub hints: &'static str,
    pub theme: &'a Theme,
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = match self.notice {
            Some(notice) => {
                let style = match notice.level {
                    NoticeLevel::Info => Style::default().fg(self.theme.accent),
                    NoticeLevel::Error => Style::default().fg(self.theme.error),
                };
                Line::from(Span::styled(notice.text.clone(), style))
            }
            None => Line::from(Span::styled(self.hints, self.theme.hint())),
        };
        frame.render_widget(line, area);
    }
}
