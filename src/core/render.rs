//! # Renderer seam
//!
//! The core only needs "markdown text + width in, styled text out". The
//! concrete renderer lives in the TUI adapter (`tui::markdown`).

use std::fmt;

use ratatui::text::Text;

/// Styled, pre-wrapped note content ready for the viewer.
pub type StyledText = Text<'static>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The note bytes are not UTF-8.
    InvalidUtf8(String),
    /// A zero-column viewport cannot hold any text.
    ZeroWidth,
    /// The renderer itself gave up.
    Failed(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidUtf8(msg) => write!(f, "note is not valid UTF-8: {msg}"),
            RenderError::ZeroWidth => write!(f, "cannot render into a zero-width viewport"),
            RenderError::Failed(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Markdown to styled terminal text. Must be deterministic for equal inputs;
/// `width` only changes where lines wrap.
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str, width: u16) -> Result<StyledText, RenderError>;
}

/// Decode raw note bytes and render them at `width`.
pub fn render_note(
    renderer: &dyn Renderer,
    bytes: &[u8],
    width: u16,
) -> Result<StyledText, RenderError> {
    if width == 0 {
        return Err(RenderError::ZeroWidth);
    }
    let markdown =
        std::str::from_utf8(bytes).map_err(|e| RenderError::InvalidUtf8(e.to_string()))?;
    renderer.render(markdown, width)
}
