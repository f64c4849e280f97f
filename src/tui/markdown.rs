//! Markdown → ratatui `Text` renderer.
//!
//! Converts `pulldown_cmark` events into styled lines, then wraps them to
//! the viewport width. Headings, emphasis, inline code, fenced code blocks
//! (syntect highlighting), lists, task lists, blockquotes, links, images
//! (alt text) and tables.
//!
//! Block prefixes (`│ ` for quotes and code) are kept apart from line
//! content so wrapped continuation lines repeat them.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::render::{RenderError, Renderer, StyledText};
use crate::tui::theme::Theme;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// The note renderer used by the app.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    palette: Palette,
}

impl MarkdownRenderer {
    pub fn new(theme: &Theme) -> Self {
        Self {
            palette: Palette {
                text: theme.text,
                muted: theme.muted,
                link: theme.accent,
                code_fg: theme.code_fg,
                code_bg: theme.code_bg,
            },
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, markdown: &str, width: u16) -> Result<StyledText, RenderError> {
        if width == 0 {
            return Err(RenderError::ZeroWidth);
        }
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);
        opts.insert(Options::ENABLE_TABLES);

        let mut w = Writer::new(self.palette);
        for event in Parser::new_ext(markdown, opts) {
            w.handle(event);
        }
        Ok(w.finish(width as usize))
    }
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    text: Color,
    muted: Color,
    link: Color,
    code_fg: Color,
    code_bg: Color,
}

// ── Writer ──────────────────────────────────────────────────────────────────

/// A logical line before wrapping: block prefix + content.
struct Row {
    prefix: Vec<Span<'static>>,
    body: Vec<Span<'static>>,
}

struct Writer {
    rows: Vec<Row>,
    palette: Palette,
    /// Inline style stack. Styles compose via `patch`, so bold inside a
    /// heading stays heading-colored.
    styles: Vec<Style>,
    /// Per-line block prefixes (blockquote, code block border).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = next ordered number.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_plain_code: bool,
    link_url: Option<String>,
    /// Cells of the table row being built.
    table_cells: Option<Vec<Vec<Span<'static>>>>,
    needs_newline: bool,
    /// A list marker was just written; the item's first paragraph continues it.
    item_open: bool,
}

impl Writer {
    fn new(palette: Palette) -> Self {
        Self {
            rows: vec![],
            palette,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            table_cells: None,
            needs_newline: false,
            item_open: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.palette.text))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn muted(&self) -> Style {
        Style::default().fg(self.palette.muted)
    }

    fn push_row(&mut self, body: Vec<Span<'static>>) {
        self.rows.push(Row {
            prefix: self.line_prefixes.clone(),
            body,
        });
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(cells) = self.table_cells.as_mut() {
            match cells.last_mut() {
                Some(cell) => cell.push(span),
                None => cells.push(vec![span]),
            }
            return;
        }
        match self.rows.last_mut() {
            Some(row) => row.body.push(span),
            None => self.push_row(vec![span]),
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_row(vec![]);
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        if !matches!(event, Event::Start(Tag::Paragraph) | Event::TaskListMarker(_)) {
            self.item_open = false;
        }
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_row(vec![]),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_row(vec![Span::styled("─".repeat(40), self.muted())]);
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.muted()));
            }
            _ => {} // HTML, footnotes, math
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if std::mem::take(&mut self.item_open) {
                    return;
                }
                self.blank_line_if_needed();
                self.push_row(vec![]);
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = heading_style(self.palette.text, level);
                let marker = format!("{} ", "#".repeat(heading_depth(level)));
                self.push_row(vec![Span::styled(marker, hs)]);
                self.push_style(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes.push(Span::styled("│ ", self.muted()));
                self.push_style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                if !self.rows.is_empty() {
                    self.push_row(vec![]);
                }
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };

                let border = self.muted();
                let top = if lang.is_empty() {
                    vec![Span::styled("╭──", border)]
                } else {
                    vec![
                        Span::styled("╭── ", border),
                        Span::styled(lang.to_owned(), border.add_modifier(Modifier::BOLD)),
                        Span::styled(" ──", border),
                    ]
                };
                self.push_row(top);
                self.line_prefixes.push(Span::styled("│ ", border));

                if let Some(syn) = SYNTAX_SET
                    .find_syntax_by_token(lang)
                    .filter(|_| !lang.is_empty())
                    && let Some(theme) = THEME_SET.themes.get(CODE_THEME)
                {
                    self.highlighter = Some(HighlightLines::new(syn, theme));
                }
                self.in_plain_code = self.highlighter.is_none();
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.needs_newline = false;
                self.item_open = true;
                self.push_row(vec![]);
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}• "),
                        Some(n) => {
                            let s = format!("{indent}{n}. ");
                            *n += 1;
                            s
                        }
                    };
                    let style = Style::default().fg(self.palette.muted);
                    self.push_span(Span::styled(marker, style));
                }
            }
            Tag::Table(_) => {
                self.blank_line_if_needed();
            }
            Tag::TableHead | Tag::TableRow => {
                self.table_cells = Some(vec![]);
            }
            Tag::TableCell => {
                if let Some(cells) = self.table_cells.as_mut() {
                    cells.push(vec![]);
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(self.palette.link)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Image { .. } => {
                self.push_span(Span::styled("[image: ", self.muted()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            _ => {} // Footnote and definition lists
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop();
                self.push_row(vec![Span::styled("╰──", self.muted())]);
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let is_head = matches!(tag, TagEnd::TableHead);
                self.finish_table_row(is_head);
            }
            TagEnd::Table => self.needs_newline = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    let style = Style::default().fg(self.palette.link);
                    self.push_span(Span::styled(format!(" ({url})"), style));
                }
            }
            TagEnd::Image => {
                self.pop_style();
                self.push_span(Span::styled("]", self.muted()));
            }
            _ => {}
        }
    }

    fn finish_table_row(&mut self, is_head: bool) {
        let Some(cells) = self.table_cells.take() else {
            return;
        };
        let separator = Span::styled(" │ ", self.muted());
        let mut body = vec![];
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                body.push(separator.clone());
            }
            body.extend(cell.into_iter().map(|span| {
                if is_head {
                    let style = span.style.add_modifier(Modifier::BOLD);
                    span.style(style)
                } else {
                    span
                }
            }));
        }
        let width: usize = body.iter().map(|s| s.content.width()).sum();
        self.push_row(body);
        if is_head {
            self.push_row(vec![Span::styled("─".repeat(width.max(3)), self.muted())]);
        }
    }

    // ── Content ─────────────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui draws \t as zero-width
        let text = cow.replace('\t', "    ");

        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) else {
                    self.push_row(vec![Span::raw(line.trim_end_matches('\n').to_owned())]);
                    continue;
                };
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(hl_style, frag)| {
                        let content = frag.trim_end_matches('\n');
                        if content.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(
                            hl_style.foreground.r,
                            hl_style.foreground.g,
                            hl_style.foreground.b,
                        );
                        Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                    })
                    .collect();
                self.push_row(spans);
            }
            self.highlighter = Some(hl);
            return;
        }

        if self.in_plain_code {
            let code_style = Style::default().fg(self.palette.code_fg);
            for line in text.lines() {
                self.push_row(vec![Span::styled(line.to_owned(), code_style)]);
            }
            return;
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        let style = Style::default()
            .fg(self.palette.code_fg)
            .bg(self.palette.code_bg);
        self.push_span(Span::styled(cow.to_string(), style));
    }

    /// Wrap every row to `width` columns and flatten into `Text`.
    fn finish(self, width: usize) -> Text<'static> {
        let mut lines = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            let prefix_width: usize = row.prefix.iter().map(|s| s.content.width()).sum();
            let avail = width.saturating_sub(prefix_width).max(1);
            for chunk in wrap_spans(row.body, avail) {
                let mut spans = row.prefix.clone();
                spans.extend(chunk);
                lines.push(Line::from(spans));
            }
        }
        Text::from(lines)
    }
}

// ── Wrapping ────────────────────────────────────────────────────────────────

/// Greedy word wrap across styled spans. Words wider than `width` are split
/// at character boundaries. Always returns at least one (possibly empty) row.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let mut rows: Vec<Vec<Span<'static>>> = vec![vec![]];
    let mut used = 0;

    for span in spans {
        let style = span.style;
        for piece in split_words(&span.content) {
            let visible = piece.trim_end().width();
            if used > 0 && used + visible > width {
                rows.push(vec![]);
                used = 0;
            }
            if visible <= width {
                append(&mut rows, piece, style);
                used += piece.width();
                continue;
            }
            for ch in piece.chars() {
                let w = ch.width().unwrap_or(0);
                if used > 0 && used + w > width {
                    rows.push(vec![]);
                    used = 0;
                }
                let mut buf = [0; 4];
                append(&mut rows, ch.encode_utf8(&mut buf), style);
                used += w;
            }
        }
    }
    rows
}

/// Split into words that keep their trailing whitespace.
fn split_words(s: &str) -> Vec<&str> {
    let mut pieces = vec![];
    let mut start = 0;
    let mut in_space = false;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            pieces.push(&s[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < s.len() {
        pieces.push(&s[start..]);
    }
    pieces
}

/// Append to the last row, merging into the previous span when styles match.
fn append(rows: &mut [Vec<Span<'static>>], text: &str, style: Style) {
    let Some(row) = rows.last_mut() else {
        return;
    };
    match row.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(text),
        _ => row.push(Span::styled(text.to_owned(), style)),
    }
}

fn heading_style(fg: Color, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().fg(fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
