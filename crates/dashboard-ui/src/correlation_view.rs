//! Feature correlation panel.
//!
//! Draws each feature's Pearson coefficient against the target as a
//! horizontal bar (length = magnitude, colour = sign) next to an insight
//! column naming the strongest factor.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use dashboard_core::formatting::{format_number, format_signed, NOT_AVAILABLE};
use dashboard_data::analysis::{strongest_factor, FeatureCorrelation};

use crate::labels::Labels;
use crate::themes::Theme;

/// Coefficients are drawn as integer bar lengths on a `0..=BAR_SCALE` axis.
pub const BAR_SCALE: u64 = 1000;

/// One bar per feature, in the order given. Undefined coefficients get an
/// empty bar labelled `n/a`.
pub fn correlation_bars(correlations: &[FeatureCorrelation], theme: &Theme) -> Vec<Bar<'static>> {
    correlations
        .iter()
        .map(|c| {
            let style = theme.correlation_style(c.coefficient);
            let length = c
                .coefficient
                .map_or(0, |v| (v.abs().min(1.0) * BAR_SCALE as f64).round() as u64);
            let text = c
                .coefficient
                .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_signed(v, 3));
            Bar::default()
                .label(Line::from(c.feature.clone()))
                .value(length)
                .text_value(text)
                .style(style)
                .value_style(style.add_modifier(Modifier::REVERSED))
        })
        .collect()
}

/// Strongest factor followed by the colour legend.
pub fn insight_lines(correlations: &[FeatureCorrelation], labels: &Labels, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match strongest_factor(correlations) {
        Some(top) => lines.push(Line::from(vec![
            Span::styled(labels.strongest_factor, theme.success.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(top.feature.clone(), theme.value),
            Span::styled(format!(" {} ", labels.with_correlation), theme.text),
            Span::styled(
                top.coefficient.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_number(v, 3)),
                theme.value,
            ),
        ])),
        None => lines.push(Line::from(Span::styled(labels.no_correlation, theme.warning))),
    }
    lines.push(Line::from(""));
    for (i, note) in labels.interpretation.iter().enumerate() {
        let style = match i {
            0 => theme.positive,
            1 => theme.negative,
            _ => theme.dim,
        };
        lines.push(Line::from(vec![
            Span::styled("- ", theme.dim),
            Span::styled(*note, style),
        ]));
    }
    lines
}

/// Render the correlation panel into `area`.
pub fn render_correlation_panel(
    frame: &mut Frame,
    area: Rect,
    correlations: &[FeatureCorrelation],
    labels: &Labels,
    theme: &Theme,
) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(format!(" {} ", labels.correlation_title), theme.header));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(inner);

    if correlations.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(labels.no_correlation, theme.warning)),
            columns[0],
        );
    } else {
        let bars = correlation_bars(correlations, theme);
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::NONE)
                    .title(Span::styled(labels.correlation_chart, theme.label)),
            )
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(BAR_SCALE)
            .label_style(theme.label)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, columns[0]);
    }

    let insight = Paragraph::new(Text::from(insight_lines(correlations, labels, theme)))
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(theme.separator)
                .title(Span::styled(format!(" {} ", labels.insight), theme.header_accent)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(insight, columns[1]);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
