use ratatui::style::{Color, Modifier, Style};

/// Colors used by every view and by the Markdown renderer.
///
/// Passed down explicitly; nothing reads a global palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    pub selection: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            error: Color::Red,
            code_fg: Color::Yellow,
            code_bg: Color::Rgb(40, 40, 40),
            selection: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
