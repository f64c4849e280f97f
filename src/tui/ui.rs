use crate::core::error::AppError;
use crate::core::state::{App, AppState, Slot};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    NoteList, NoteView, PathPrompt, SCROLLBAR_WIDTH, StatusBar, TitleBar,
};
use crate::tui::theme::Theme;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

/// Title line, body, status line.
fn layout(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(1)]).areas(area)
}

/// Size notes are rendered at for a terminal of `area`: the body minus the
/// scrollbar column.
pub fn content_size(area: Rect) -> (u16, u16) {
    let [_, body, _] = layout(area);
    (body.width.saturating_sub(SCROLLBAR_WIDTH), body.height)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, theme: &Theme) {
    let [title_area, body_area, status_area] = layout(frame.area());

    let location = match &app.state {
        AppState::Browsing(browser) => browser.root.display().to_string(),
        AppState::Viewing(viewer) => viewer.note.display_path(&viewer.browser.root),
        _ => String::new(),
    };
    let busy = [Slot::Config, Slot::Scan, Slot::Content]
        .into_iter()
        .any(|slot| app.in_flight.is_busy(slot));
    TitleBar::new(location, busy, theme).render(frame, title_area);

    match &app.state {
        AppState::AwaitingConfig => {
            draw_placeholder(frame, body_area, "Loading configuration…", theme)
        }
        AppState::PromptingForPath { input } => {
            PathPrompt { input, theme }.render(frame, body_area)
        }
        AppState::Browsing(browser) => NoteList {
            browser,
            list_state: &mut tui.list_state,
            theme,
        }
        .render(frame, body_area),
        AppState::Viewing(viewer) => NoteView { viewer }.render(frame, body_area),
        AppState::Fatal(error) => draw_error_view(frame, body_area, error, theme),
    }

    StatusBar {
        notice: app.notice.as_ref(),
        hints: hints(&app.state),
        theme,
    }
    .render(frame, status_area);
}

fn hints(state: &AppState) -> &'static str {
    match state {
        AppState::AwaitingConfig => "q quit",
        AppState::PromptingForPath { .. } => "Enter save  Esc quit",
        AppState::Browsing(browser) if browser.filtering => "Enter accept  Esc clear  ↑↓ move",
        AppState::Browsing(_) => "↑↓/jk move  Enter open  / filter  q quit",
        AppState::Viewing(_) => "↑↓ scroll  space/b page  g/G top/bottom  q back",
        AppState::Fatal(_) => "press any key to exit",
    }
}

fn draw_placeholder(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let paragraph = Paragraph::new(message)
        .style(theme.hint())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error: &AppError, theme: &Theme) {
    let style = Style::default().fg(theme.error);
    let lines = vec![
        Line::from(format!("{:?}", error.kind())),
        Line::default(),
        Line::from(error.to_string()),
    ];
    let error_paragraph = Paragraph::new(lines)
        .block(Block::bordered().title("ERROR").border_style(style))
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}
