//! Weekday vs weekend comparison panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use dashboard_core::formatting::{format_number, format_optional, format_signed_percent, NOT_AVAILABLE};
use dashboard_core::models::{WeekdayConvention, WeekendCodes};
use dashboard_data::aggregator::WeekendComparison;

use crate::labels::Labels;
use crate::themes::Theme;

/// How the weekend split was configured, shown under the statistics so the
/// reader knows which days were counted as weekend.
#[derive(Debug, Clone, Copy)]
pub struct WeekendMapping<'a> {
    pub codes: &'a WeekendCodes,
    pub convention: WeekdayConvention,
}

pub fn comparison_bars(comparison: &WeekendComparison, labels: &Labels, theme: &Theme) -> Vec<Bar<'static>> {
    [
        (labels.weekday, &comparison.weekday, theme.weekday_bar),
        (labels.weekend, &comparison.weekend, theme.weekend_bar),
    ]
    .into_iter()
    .map(|(label, partition, style)| {
        Bar::default()
            .label(Line::from(label))
            .value(partition.mean.map_or(0, |m| m.max(0.0).round() as u64))
            .text_value(format_optional(partition.mean, 0))
            .style(style)
            .value_style(style.add_modifier(Modifier::REVERSED))
    })
    .collect()
}

/// Means, difference, weekend mapping and the directional insight.
pub fn statistics_lines(
    comparison: &WeekendComparison,
    mapping: WeekendMapping<'_>,
    labels: &Labels,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let difference = match (comparison.difference(), comparison.percent_difference()) {
        (Some(diff), Some(pct)) => format!("{} ({})", format_number(diff, 0), format_signed_percent(pct, 1)),
        (Some(diff), None) => format!("{} ({})", format_number(diff, 0), NOT_AVAILABLE),
        _ => NOT_AVAILABLE.to_string(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{}: ", labels.weekday), theme.weekday_bar),
            Span::styled(format_optional(comparison.weekday.mean, 0), theme.value),
            Span::styled(format!("  ({})", comparison.weekday.days), theme.dim),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", labels.weekend), theme.weekend_bar),
            Span::styled(format_optional(comparison.weekend.mean, 0), theme.value),
            Span::styled(format!("  ({})", comparison.weekend.days), theme.dim),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", labels.difference), theme.label),
            Span::styled(difference, theme.value),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", labels.weekend_days), theme.label),
            Span::styled(
                labels.weekend_day_names(mapping.codes, mapping.convention),
                theme.text,
            ),
            Span::styled(
                format!(" [{}, {}]", mapping.codes, mapping.convention),
                theme.dim,
            ),
        ]),
        Line::from(""),
    ];

    if let Some(higher) = comparison.higher() {
        lines.push(Line::from(Span::styled(labels.higher_insight(higher), theme.info)));
    }
    lines
}

/// Render the weekday/weekend panel into `area`.
pub fn render_weekend_panel(
    frame: &mut Frame,
    area: Rect,
    comparison: &WeekendComparison,
    mapping: WeekendMapping<'_>,
    labels: &Labels,
    theme: &Theme,
) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", labels.weekend_title), theme.header));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(inner);

    let bars = comparison_bars(comparison, labels, theme);
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, columns[0]);

    let stats = Paragraph::new(Text::from(statistics_lines(comparison, mapping, labels, theme)))
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(theme.separator),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(stats, columns[1]);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
