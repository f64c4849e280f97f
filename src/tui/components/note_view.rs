//! # NoteView Component
//!
//! Draws the visible slice of a rendered note, starting at
//! `Viewer::scroll`, with a scrollbar in the rightmost column. Content is
//! already wrapped to the viewport width, so no `Paragraph` wrapping here.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::state::Viewer;
use crate::tui::component::Component;

/// Columns reserved on the right for the scrollbar.
pub const SCROLLBAR_WIDTH: u16 = 1;

pub struct NoteView<'a> {
    pub viewer: &'a Viewer,
}

impl Component for NoteView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = &self.viewer.content.lines;
        let height = area.height as usize;
        let start = self.viewer.scroll.min(lines.len());
        let end = (start + height).min(lines.len());

        let text_area = Rect {
            width: area.width.saturating_sub(SCROLLBAR_WIDTH),
            ..area
        };
        let visible = Text::from(lines[start..end].to_vec());
        frame.render_widget(Paragraph::new(visible), text_area);

        if lines.len() <= height {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(self.viewer.max_scroll(area.height))
            .position(self.viewer.scroll);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}
