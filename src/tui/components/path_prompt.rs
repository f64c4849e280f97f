//! # PathPrompt Component
//!
//! First-run screen asking where the notes live. The entered text is
//! wrapped with `textwrap` so long paths stay visible in narrow terminals.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::tui::component::Component;
use crate::tui::theme::Theme;

const QUESTION: &str = "Where are your notes? Enter a directory path (~ is allowed).";

/// Border (2) + padding (2) consumed horizontally by the block
const HORIZONTAL_OVERHEAD: u16 = 4;

pub struct PathPrompt<'a> {
    pub input: &'a str,
    pub theme: &'a Theme,
}

impl PathPrompt<'_> {
    /// Lines of the input text wrapped to `width`, cursor appended.
    fn input_lines(&self, width: u16) -> Vec<String> {
        let text = format!("{}▏", self.input);
        let options = textwrap::Options::new(width.max(1) as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        textwrap::wrap(&text, options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }
}

impl Component for PathPrompt<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(72);
        let inner_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let input_lines = self.input_lines(inner_width);
        // question + blank + input + borders
        let height = (input_lines.len() as u16 + 4).min(area.height);

        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, overlay, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(row);

        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.hint())
            .title(" Notes directory ")
            .title_bottom(Line::from(" Enter save  Esc quit ").centered())
            .padding(Padding::horizontal(1));

        let mut lines = vec![
            Line::from(Span::raw(QUESTION)),
            Line::default(),
        ];
        lines.extend(
            input_lines
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(self.theme.accent)))),
        );
        frame.render_widget(Paragraph::new(lines).block(block), overlay);
    }
}
