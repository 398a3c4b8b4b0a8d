//! Plain-text rendering of the dashboard for `--view report`.
//!
//! Reuses the line builders of the TUI panels and flattens their spans, so
//! the report and the interactive dashboard always say the same thing.

use std::fmt::Write as _;

use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

use dashboard_core::formatting::{format_count, format_period, format_signed, NOT_AVAILABLE};
use dashboard_core::models::WeekdayConvention;
use dashboard_data::aggregator::MonthlyTrend;
use dashboard_data::analysis::FeatureCorrelation;
use dashboard_runtime::session::{DashboardSession, TrendView};

use crate::components::date_picker::{picker_pair, DatePicker};
use crate::components::header::Header;
use crate::components::metrics::{dataset_info, overall_metrics, period_metrics};
use crate::correlation_view::insight_lines;
use crate::labels::Labels;
use crate::themes::Theme;
use crate::trend_view::status_line;
use crate::weekend_view::{statistics_lines, WeekendMapping};

/// Widest text bar drawn in the report.
const BAR_WIDTH: usize = 40;

fn plain(line: &Line) -> String {
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    text.trim_end().to_string()
}

fn text_bar(fraction: f64) -> String {
    let cells = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(cells)
}

fn push_lines(out: &mut String, lines: &[Line], indent: &str) {
    for line in lines {
        let _ = writeln!(out, "{}{}", indent, plain(line));
    }
}

fn correlation_rows(out: &mut String, correlations: &[FeatureCorrelation]) {
    let width = correlations.iter().map(|c| c.feature.width()).max().unwrap_or(0);
    for c in correlations {
        let pad = " ".repeat(width - c.feature.width());
        let value = c
            .coefficient
            .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_signed(v, 3));
        let bar = text_bar(c.coefficient.map_or(0.0, f64::abs));
        let _ = writeln!(out, "  {}{}  {:>6}  {}", c.feature, pad, value, bar);
    }
}

fn trend_rows(out: &mut String, trend: &MonthlyTrend) {
    let max = trend.max_total().unwrap_or(0.0);
    let totals: Vec<String> = trend.points.iter().map(|p| format_count(p.total)).collect();
    let width = totals.iter().map(|t| t.len()).max().unwrap_or(0);
    for (point, total) in trend.points.iter().zip(&totals) {
        let fraction = if max > 0.0 { point.total / max } else { 0.0 };
        let _ = writeln!(out, "  {}  {:>width$}  {}", point.month, total, text_bar(fraction), width = width);
    }
}

/// Render every dashboard section for the session's current state.
pub fn render_report(
    session: &DashboardSession,
    source: &str,
    convention: WeekdayConvention,
    labels: &Labels,
) -> String {
    let theme = Theme::classic();
    let mut out = String::new();

    let period = session
        .table()
        .and_then(|t| t.date_bounds())
        .map(|(start, end)| format_period(start, end));
    push_lines(
        &mut out,
        &Header::new(labels.title, source, period.as_deref(), &theme).to_lines(),
        "",
    );

    if let Some(message) = session.load_error() {
        let _ = writeln!(out, "{}: {}", labels.load_error, message);
        return out;
    }

    match session.overview() {
        Some(Ok(overview)) => {
            let _ = writeln!(out, "{}", labels.dataset_info);
            push_lines(&mut out, &dataset_info(labels, &overview.summary, &theme).to_column(), "  ");
            push_lines(&mut out, &[overall_metrics(labels, &overview.summary, &theme).to_line()], "");
            out.push('\n');

            let _ = writeln!(out, "{}", labels.correlation_title);
            correlation_rows(&mut out, &overview.correlations);
            push_lines(&mut out, &insight_lines(&overview.correlations, labels, &theme), "");
            out.push('\n');

            let _ = writeln!(out, "{}", labels.weekend_title);
            let mapping = WeekendMapping {
                codes: &session.config().weekend_codes,
                convention,
            };
            push_lines(&mut out, &statistics_lines(&overview.weekend, mapping, labels, &theme), "  ");
            out.push('\n');
        }
        Some(Err(message)) => {
            let _ = writeln!(out, "{}", message);
            out.push('\n');
        }
        None => {}
    }

    let _ = writeln!(out, "{}", labels.trend_title);
    if let Some(selection) = session.selection() {
        let pickers = picker_pair(
            DatePicker::new(labels.start_date, selection.start(), false, &theme),
            DatePicker::new(labels.end_date, selection.end(), false, &theme),
        );
        push_lines(&mut out, &[pickers], "  ");
    }
    let view = session.trend();
    if let TrendView::Ready { trend, metrics } = view {
        push_lines(&mut out, &[period_metrics(labels, metrics, &theme).to_line()], "  ");
        trend_rows(&mut out, trend);
    }
    if let Some(line) = status_line(view, labels, &theme) {
        push_lines(&mut out, &[line], "");
    }

    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
