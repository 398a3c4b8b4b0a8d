use dashboard_core::formatting::{format_count, format_optional, format_period, NOT_AVAILABLE};
use dashboard_data::aggregator::SummaryMetrics;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::labels::Labels;
use crate::themes::Theme;

/// Minimum display width of one `label: value` cell.
const CELL_WIDTH: usize = 28;

/// A single headline figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric<'a> {
    pub label: &'a str,
    pub value: String,
}

// ── MetricStrip ──────────────────────────────────────────────────────────────

/// Row of labelled figures drawn on one line, each cell padded to the same
/// display width.
pub struct MetricStrip<'a> {
    pub metrics: Vec<Metric<'a>>,
    pub theme: &'a Theme,
}

impl<'a> MetricStrip<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            metrics: Vec::new(),
            theme,
        }
    }

    pub fn push(mut self, label: &'a str, value: impl Into<String>) -> Self {
        self.metrics.push(Metric {
            label,
            value: value.into(),
        });
        self
    }

    /// `Label: value    Label: value ...`
    pub fn to_line(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.metrics.len() * 3);
        for metric in &self.metrics {
            let used = metric.label.width() + 2 + metric.value.width();
            spans.push(Span::styled(format!("{}: ", metric.label), self.theme.label));
            spans.push(Span::styled(metric.value.clone(), self.theme.value));
            spans.push(Span::raw(" ".repeat(CELL_WIDTH.saturating_sub(used).max(2))));
        }
        Line::from(spans)
    }

    /// One `label: value` line per metric, labels padded to a common width.
    pub fn to_column(&self) -> Vec<Line<'a>> {
        let width = self.metrics.iter().map(|m| m.label.width()).max().unwrap_or(0);
        self.metrics
            .iter()
            .map(|m| {
                let pad = " ".repeat(width - m.label.width());
                Line::from(vec![
                    Span::styled(format!("{}{}  ", m.label, pad), self.theme.label),
                    Span::styled(m.value.clone(), self.theme.value),
                ])
            })
            .collect()
    }
}

// ── Builders ─────────────────────────────────────────────────────────────────

/// Record count, period and total over the whole dataset.
pub fn dataset_info<'a>(labels: &'a Labels, summary: &SummaryMetrics, theme: &'a Theme) -> MetricStrip<'a> {
    let period = summary
        .period
        .map_or_else(|| NOT_AVAILABLE.to_string(), |(start, end)| format_period(start, end));
    MetricStrip::new(theme)
        .push(labels.total_records, format_count(summary.records as f64))
        .push(labels.data_period, period)
        .push(labels.total_rentals, format_count(summary.total))
}

/// Average, median and highest daily value over the whole dataset.
pub fn overall_metrics<'a>(labels: &'a Labels, summary: &SummaryMetrics, theme: &'a Theme) -> MetricStrip<'a> {
    MetricStrip::new(theme)
        .push(labels.average_per_day, format_optional(summary.mean, 0))
        .push(labels.median_rentals, format_optional(summary.median, 0))
        .push(labels.highest_rentals, format_optional(summary.max, 0))
}

/// Days, total, average and peak within the selected date range.
pub fn period_metrics<'a>(labels: &'a Labels, summary: &SummaryMetrics, theme: &'a Theme) -> MetricStrip<'a> {
    MetricStrip::new(theme)
        .push(labels.total_days, format_count(summary.records as f64))
        .push(labels.total_rentals, format_count(summary.total))
        .push(labels.average_day, format_optional(summary.mean, 0))
        .push(labels.peak_day, format_optional(summary.max, 0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Language;
    use chrono::NaiveDate;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn summary() -> SummaryMetrics {
        SummaryMetrics {
            records: 731,
            total: 3_292_679.0,
            mean: Some(4504.348),
            median: Some(4548.0),
            max: Some(8714.0),
            period: Some((
                NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2012, 12, 31).unwrap(),
            )),
        }
    }

    #[test]
    fn test_strip_formats_label_and_value() {
        let theme = Theme::dark();
        let line = MetricStrip::new(&theme).push("Peak Day", "8,714").to_line();
        assert!(text(&line).starts_with("Peak Day: 8,714"));
        assert_eq!(line.spans.len(), 3);
    }

    #[test]
    fn test_overall_metrics_values() {
        let theme = Theme::dark();
        let labels = Language::English.labels();
        let line = text(&overall_metrics(labels, &summary(), &theme).to_line());
        assert!(line.contains("Average Rentals/Day: 4,504"), "got: {line}");
        assert!(line.contains("Median Rentals: 4,548"), "got: {line}");
        assert!(line.contains("Highest Rentals: 8,714"), "got: {line}");
    }

    #[test]
    fn test_dataset_info_values() {
        let theme = Theme::dark();
        let labels = Language::English.labels();
        let lines = dataset_info(labels, &summary(), &theme).to_column();
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).ends_with("731"));
        assert!(text(&lines[1]).ends_with("2011-01-01 to 2012-12-31"));
        assert!(text(&lines[2]).ends_with("3,292,679"));
    }

    #[test]
    fn test_column_labels_are_aligned() {
        let theme = Theme::dark();
        let labels = Language::English.labels();
        let lines = dataset_info(labels, &summary(), &theme).to_column();
        let widths: Vec<usize> = lines.iter().map(|l| l.spans[0].content.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }

    #[test]
    fn test_period_metrics_undefined_values() {
        let theme = Theme::dark();
        let labels = Language::English.labels();
        let empty = SummaryMetrics {
            records: 0,
            total: 0.0,
            mean: None,
            median: None,
            max: None,
            period: None,
        };
        let line = text(&period_metrics(labels, &empty, &theme).to_line());
        assert!(line.contains("Total Days: 0"));
        assert!(line.contains("Average/Day: n/a"));
        assert!(line.contains("Peak Day: n/a"));
    }
}
