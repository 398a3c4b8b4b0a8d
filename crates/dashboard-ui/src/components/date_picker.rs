use chrono::NaiveDate;
use dashboard_core::formatting::format_date;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// One date input, drawn as `Label: < 2011-01-01 >`. The arrows are only
/// shown while the picker has focus.
pub struct DatePicker<'a> {
    pub label: &'a str,
    pub date: NaiveDate,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl<'a> DatePicker<'a> {
    pub fn new(label: &'a str, date: NaiveDate, focused: bool, theme: &'a Theme) -> Self {
        Self {
            label,
            date,
            focused,
            theme,
        }
    }

    pub fn to_spans(&self) -> Vec<Span<'a>> {
        let (open, close) = if self.focused { ("< ", " >") } else { ("  ", "  ") };
        vec![
            Span::styled(format!("{}: ", self.label), self.theme.label),
            Span::styled(
                format!("{}{}{}", open, format_date(self.date), close),
                self.theme.picker_style(self.focused),
            ),
        ]
    }
}

/// Start and end pickers side by side on one line.
pub fn picker_pair<'a>(start: DatePicker<'a>, end: DatePicker<'a>) -> Line<'a> {
    let mut spans = start.to_spans();
    spans.push(Span::raw("    "));
    spans.extend(end.to_spans());
    Line::from(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
