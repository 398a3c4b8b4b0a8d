//! Monthly trend panel: date pickers, filtered-period metrics and a line
//! chart of monthly totals.
//!
//! This is the only panel that depends on the selected date range, so it is
//! also the only place the invalid-range and empty-range states are shown.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use dashboard_core::formatting::{format_count, format_date};
use dashboard_core::models::{DateRangeSelection, RangeEndpoint};
use dashboard_data::aggregator::MonthlyTrend;
use dashboard_runtime::session::TrendView;

use crate::components::date_picker::{picker_pair, DatePicker};
use crate::components::metrics::period_metrics;
use crate::labels::Labels;
use crate::themes::Theme;

/// Chart coordinates: x is the month's position, y its total.
pub fn trend_points(trend: &MonthlyTrend) -> Vec<(f64, f64)> {
    trend
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.total))
        .collect()
}

/// First, middle and last month labels for the x axis.
pub fn month_axis_labels(trend: &MonthlyTrend) -> Vec<String> {
    let months: Vec<&str> = trend.points.iter().map(|p| p.month.as_str()).collect();
    match months.len() {
        0 => Vec::new(),
        1 => vec![months[0].to_string()],
        2 => vec![months[0].to_string(), months[1].to_string()],
        n => vec![
            months[0].to_string(),
            months[n / 2].to_string(),
            months[n - 1].to_string(),
        ],
    }
}

/// The line under the chart: the direction sentence, or one of the
/// non-chart states.
///
/// A trend with a single month has no direction and yields no line.
pub fn status_line(view: &TrendView, labels: &Labels, theme: &Theme) -> Option<Line<'static>> {
    match view {
        TrendView::Pending => Some(Line::from(Span::styled(labels.loading, theme.dim))),
        TrendView::Ready { trend, .. } => {
            let direction = trend.direction()?;
            let (first, last) = (trend.first()?, trend.last()?);
            Some(Line::from(Span::styled(
                labels.trend_sentence(direction, &first.month, &last.month),
                theme.info,
            )))
        }
        TrendView::NoData { .. } => Some(Line::from(Span::styled(labels.no_data, theme.warning))),
        TrendView::InvalidRange { start, end } => Some(Line::from(vec![
            Span::styled(labels.invalid_range, theme.error.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({} > {})", format_date(*start), format_date(*end)),
                theme.dim,
            ),
        ])),
        TrendView::Failed(message) => Some(Line::from(Span::styled(message.clone(), theme.error))),
    }
}

fn render_chart(frame: &mut Frame, area: Rect, trend: &MonthlyTrend, labels: &Labels, theme: &Theme) {
    let points = trend_points(trend);
    let max = trend.max_total().unwrap_or(0.0).max(1.0);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let dataset = Dataset::default()
        .name(labels.total_rentals)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.trend_line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::NONE)
                .title(Span::styled(labels.trend_chart, theme.label)),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(month_axis_labels(trend)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, max * 1.1])
                .labels(vec![
                    "0".to_string(),
                    format_count(max / 2.0),
                    format_count(max),
                ]),
        )
        .legend_position(None);
    frame.render_widget(chart, area);
}

/// Render the trend panel into `area`.
///
/// `selection` is `None` until a table has been loaded; the pickers are then
/// hidden.
pub fn render_trend_panel(
    frame: &mut Frame,
    area: Rect,
    selection: Option<&DateRangeSelection>,
    focus: RangeEndpoint,
    view: &TrendView,
    labels: &Labels,
    theme: &Theme,
) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", labels.trend_title), theme.header));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    if let Some(selection) = selection {
        let pickers = picker_pair(
            DatePicker::new(
                labels.start_date,
                selection.start(),
                focus == RangeEndpoint::Start,
                theme,
            ),
            DatePicker::new(
                labels.end_date,
                selection.end(),
                focus == RangeEndpoint::End,
                theme,
            ),
        );
        frame.render_widget(Paragraph::new(pickers), rows[0]);
    }

    let status = status_line(view, labels, theme);
    match view {
        TrendView::Ready { trend, metrics } => {
            frame.render_widget(
                Paragraph::new(period_metrics(labels, metrics, theme).to_line()),
                rows[1],
            );
            render_chart(frame, rows[2], trend, labels, theme);
            if let Some(line) = status {
                frame.render_widget(Paragraph::new(line), rows[3]);
            }
        }
        _ => {
            let body = Paragraph::new(Text::from(status.into_iter().collect::<Vec<_>>()))
                .wrap(Wrap { trim: true });
            frame.render_widget(body, rows[2]);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
