use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the dashboard title.
pub const WHEELS: &str = "o-o";

/// Dashboard header rendering four lines:
///
/// 1. Title with wheel decorations.
/// 2. A 60-column `=` separator.
/// 3. Data source and dataset period in `[ source | period ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    pub title: &'a str,
    /// Dataset URL or path as given on the command line.
    pub source: &'a str,
    /// Formatted dataset period, `None` before the first load.
    pub period: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, source: &'a str, period: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            title,
            source,
            period,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(WHEELS, self.theme.header_accent),
                Span::styled(format!(" {} ", self.title), self.theme.header),
                Span::styled(WHEELS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.period.unwrap_or("..."), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
