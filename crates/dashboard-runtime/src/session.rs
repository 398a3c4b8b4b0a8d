//! Per-session dashboard state.
//!
//! [`DashboardSession`] owns the date range picked by the user and the views
//! derived from the shared table. Views that depend only on the full table
//! are computed once when a table is attached; editing the date range
//! recomputes the trend view and nothing else.

use std::sync::Arc;

use chrono::NaiveDate;
use dashboard_core::error::DashboardError;
use dashboard_core::models::{
    DateRangeSelection, RentalTable, WeekendCodes, DATE_COLUMN, DEFAULT_TARGET_COLUMN,
    WEEKDAY_COLUMN,
};
use dashboard_data::aggregator::{monthly_sum, summarize_range, MonthlyTrend, SummaryMetrics};
use dashboard_data::analysis::{analyze_dataset, DatasetOverview};

// ── SessionConfig ─────────────────────────────────────────────────────────────

/// Column names and weekend mapping used by every aggregation in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub date_column: String,
    pub weekday_column: String,
    pub target_column: String,
    pub weekend_codes: WeekendCodes,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            date_column: DATE_COLUMN.to_string(),
            weekday_column: WEEKDAY_COLUMN.to_string(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            weekend_codes: WeekendCodes::default(),
        }
    }
}

// ── TrendView ─────────────────────────────────────────────────────────────────

/// State of the date-range dependent part of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendView {
    /// No table attached yet.
    Pending,
    /// Monthly totals plus the metrics of the selected period.
    Ready {
        trend: MonthlyTrend,
        metrics: SummaryMetrics,
    },
    /// The range is valid but matches no rows.
    NoData { start: NaiveDate, end: NaiveDate },
    /// Start is after end. Only this view reports it.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// The aggregation itself failed, e.g. an unknown target column.
    Failed(String),
}

/// How many times each group of views has been computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeStats {
    pub overview_runs: usize,
    pub trend_runs: usize,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    config: SessionConfig,
    table: Option<Arc<RentalTable>>,
    selection: Option<DateRangeSelection>,
    overview: Option<Result<DatasetOverview, String>>,
    trend: TrendView,
    load_error: Option<String>,
    stats: ComputeStats,
}

impl DashboardSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            table: None,
            selection: None,
            overview: None,
            trend: TrendView::Pending,
            load_error: None,
            stats: ComputeStats::default(),
        }
    }

    // ── Data lifecycle ────────────────────────────────────────────────────

    /// Attach a freshly loaded table and compute every view.
    ///
    /// A selection from a previous table is kept (clamped to the new bounds)
    /// when the bounds are unchanged; otherwise it resets to the full range.
    pub fn attach_table(&mut self, table: Arc<RentalTable>) {
        self.load_error = None;
        let previous = self.selection;
        self.selection = table.date_bounds().map(|(min, max)| match previous {
            Some(kept) if kept.bounds() == (min, max) => kept,
            _ => DateRangeSelection::new(min, max),
        });

        self.stats.overview_runs += 1;
        self.overview = Some(
            analyze_dataset(
                &table,
                &self.config.weekday_column,
                &self.config.target_column,
                &self.config.weekend_codes,
            )
            .map_err(|e| {
                tracing::warn!(error = %e, "dataset analysis failed");
                e.to_string()
            }),
        );
        self.table = Some(table);
        self.recompute_trend();
    }

    /// Record a failed load. The session drops its table so no charts are
    /// drawn from data the user was told could not be loaded.
    pub fn record_load_failure(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
        self.table = None;
        self.overview = None;
        self.trend = TrendView::Pending;
    }

    // ── Date range ────────────────────────────────────────────────────────

    /// Apply `edit` to the date range and recompute the trend view if the
    /// range changed. Returns `true` when it did.
    pub fn edit_range(&mut self, edit: impl FnOnce(&mut DateRangeSelection)) -> bool {
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };
        let before = *selection;
        edit(selection);
        if *selection == before {
            return false;
        }
        tracing::debug!(
            start = %selection.start(),
            end = %selection.end(),
            "date range changed"
        );
        self.recompute_trend();
        true
    }

    fn recompute_trend(&mut self) {
        let (Some(table), Some(selection)) = (self.table.as_ref(), self.selection) else {
            self.trend = TrendView::Pending;
            return;
        };
        self.stats.trend_runs += 1;

        let (start, end) = (selection.start(), selection.end());
        let cfg = &self.config;
        let result = monthly_sum(table, &cfg.date_column, &cfg.target_column, start, end).and_then(
            |trend| {
                summarize_range(table, &cfg.date_column, &cfg.target_column, start, end)
                    .map(|metrics| (trend, metrics))
            },
        );

        self.trend = match result {
            Ok((trend, _)) if trend.is_empty() => TrendView::NoData { start, end },
            Ok((trend, metrics)) => TrendView::Ready { trend, metrics },
            Err(DashboardError::InvalidDateRange { start, end }) => {
                TrendView::InvalidRange { start, end }
            }
            Err(e) => TrendView::Failed(e.to_string()),
        };
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn table(&self) -> Option<&Arc<RentalTable>> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn selection(&self) -> Option<&DateRangeSelection> {
        self.selection.as_ref()
    }

    /// Date-independent views, or the message of the analysis failure.
    pub fn overview(&self) -> Option<Result<&DatasetOverview, &str>> {
        self.overview
            .as_ref()
            .map(|r| r.as_ref().map_err(String::as_str))
    }

    pub fn trend(&self) -> &TrendView {
        &self.trend
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn compute_stats(&self) -> ComputeStats {
        self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
