//! Full-screen dashboard layout.
//!
//! Stacks the header, dataset summary, the three analysis panels and a key
//! hint footer. A failed load replaces everything below the header with an
//! error panel; the feature glossary is drawn as a popup on top.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use dashboard_core::formatting::format_period;
use dashboard_core::models::{RangeEndpoint, WeekdayConvention};
use dashboard_runtime::session::DashboardSession;

use crate::components::header::Header;
use crate::components::metrics::{dataset_info, overall_metrics};
use crate::correlation_view::render_correlation_panel;
use crate::labels::Labels;
use crate::themes::Theme;
use crate::trend_view::render_trend_panel;
use crate::weekend_view::{render_weekend_panel, WeekendMapping};

/// Result of the last refresh request, shown in the footer until the next
/// load event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshNotice {
    Queued,
    NotQueued,
}

/// Everything the dashboard needs to draw one frame.
pub struct ViewContext<'a> {
    pub session: &'a DashboardSession,
    pub source: &'a str,
    pub focus: RangeEndpoint,
    pub show_help: bool,
    pub refresh: Option<RefreshNotice>,
    pub convention: WeekdayConvention,
    pub labels: &'static Labels,
    pub theme: &'a Theme,
}

pub fn render_dashboard(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let period = ctx
        .session
        .table()
        .and_then(|t| t.date_bounds())
        .map(|(start, end)| format_period(start, end));
    let header = Header::new(ctx.labels.title, ctx.source, period.as_deref(), ctx.theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), rows[0]);

    if let Some(message) = ctx.session.load_error() {
        render_load_error(frame, rows[1], message, ctx.labels, ctx.theme);
    } else if !ctx.session.is_loaded() {
        render_loading(frame, rows[1], ctx.labels, ctx.theme);
    } else {
        render_body(frame, rows[1], ctx);
    }

    let footer = match ctx.refresh {
        Some(RefreshNotice::Queued) => Span::styled(ctx.labels.refresh_queued, ctx.theme.info),
        Some(RefreshNotice::NotQueued) => Span::styled(ctx.labels.refresh_not_queued, ctx.theme.warning),
        None => Span::styled(ctx.labels.key_hints, ctx.theme.dim),
    };
    frame.render_widget(Paragraph::new(footer), rows[2]);

    if ctx.show_help {
        render_glossary(frame, area, ctx.labels, ctx.theme);
    }
}

fn render_body(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Fill(3),
            Constraint::Length(9),
            Constraint::Fill(4),
        ])
        .split(area);

    let config = ctx.session.config();
    match ctx.session.overview() {
        Some(Ok(overview)) => {
            let summary = Text::from(vec![
                dataset_info(ctx.labels, &overview.summary, ctx.theme).to_line(),
                overall_metrics(ctx.labels, &overview.summary, ctx.theme).to_line(),
            ]);
            frame.render_widget(Paragraph::new(summary), rows[0]);
            render_correlation_panel(frame, rows[1], &overview.correlations, ctx.labels, ctx.theme);
            render_weekend_panel(
                frame,
                rows[2],
                &overview.weekend,
                WeekendMapping {
                    codes: &config.weekend_codes,
                    convention: ctx.convention,
                },
                ctx.labels,
                ctx.theme,
            );
        }
        Some(Err(message)) => {
            let overview_area = Rect {
                height: rows[0].height + rows[1].height + rows[2].height,
                ..rows[0]
            };
            render_error_panel(frame, overview_area, ctx.labels.dataset_info, message, ctx.theme);
        }
        None => {}
    }

    render_trend_panel(
        frame,
        rows[3],
        ctx.session.selection(),
        ctx.focus,
        ctx.session.trend(),
        ctx.labels,
        ctx.theme,
    );
}

fn render_error_panel(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let paragraph = Paragraph::new(Span::styled(message.to_string(), theme.error))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.error)
                .title(format!(" {} ", title)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Shown in place of every chart until a load succeeds.
pub fn render_load_error(frame: &mut Frame, area: Rect, message: &str, labels: &Labels, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("{}: {}", labels.load_error, message), theme.error)),
        Line::from(""),
        Line::from(Span::styled(labels.retry_hint, theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.error)
                    .title(format!(" {} ", labels.dataset_info)),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render_loading(frame: &mut Frame, area: Rect, labels: &Labels, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(labels.loading, theme.info)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border),
        ),
        area,
    );
}

/// Column glossary popup, centred over `area`.
pub fn render_glossary(frame: &mut Frame, area: Rect, labels: &Labels, theme: &Theme) {
    let width = labels
        .glossary
        .iter()
        .map(|(column, meaning)| column.len() + meaning.len() + 8)
        .max()
        .unwrap_or(30)
        .min(area.width as usize) as u16;
    let height = (labels.glossary.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = labels
        .glossary
        .iter()
        .map(|(column, meaning)| {
            Line::from(vec![
                Span::styled(format!(" {:<11}", column), theme.value),
                Span::styled(*meaning, theme.text),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.header)
                .title(Span::styled(format!(" {} ", labels.glossary_title), theme.header)),
        ),
        popup,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
