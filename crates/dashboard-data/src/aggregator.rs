//! Grouped aggregations over the rental table: weekday vs weekend means,
//! monthly totals and summary metrics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::formatting::percent_change;
use dashboard_core::models::{RentalTable, WeekendCodes};
use dashboard_core::stats;

// ── Weekday / weekend ─────────────────────────────────────────────────────────

/// Mean of the target column over one side of the weekend split.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionMean {
    pub is_weekend: bool,
    pub days: usize,
    pub total: f64,
    /// `None` when the partition holds no rows.
    pub mean: Option<f64>,
}

impl PartitionMean {
    fn from_values(is_weekend: bool, values: &[f64]) -> Self {
        Self {
            is_weekend,
            days: values.len(),
            total: values.iter().sum(),
            mean: stats::mean(values),
        }
    }
}

/// Which partition has the larger mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HigherPartition {
    Weekday,
    Weekend,
}

/// Weekday and weekend means of the target column.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekendComparison {
    pub weekday: PartitionMean,
    pub weekend: PartitionMean,
}

impl WeekendComparison {
    /// Both partitions ordered by flag: weekday (`false`) first.
    pub fn partitions(&self) -> [&PartitionMean; 2] {
        [&self.weekday, &self.weekend]
    }

    /// `weekday mean - weekend mean`.
    pub fn difference(&self) -> Option<f64> {
        Some(self.weekday.mean? - self.weekend.mean?)
    }

    /// Difference as a percentage of the weekend mean.
    pub fn percent_difference(&self) -> Option<f64> {
        percent_change(self.weekday.mean?, self.weekend.mean?)
    }

    /// Ties count as weekend-higher.
    pub fn higher(&self) -> Option<HigherPartition> {
        let (weekday, weekend) = (self.weekday.mean?, self.weekend.mean?);
        Some(if weekday > weekend {
            HigherPartition::Weekday
        } else {
            HigherPartition::Weekend
        })
    }
}

/// Split rows by whether `weekday_column` holds one of `weekend_codes` and
/// average `target_column` on each side.
///
/// An empty side yields `mean: None` rather than an error.
pub fn average_by_weekend_flag(
    table: &RentalTable,
    weekday_column: &str,
    target_column: &str,
    weekend_codes: &WeekendCodes,
) -> Result<WeekendComparison> {
    let codes = table.require_column(weekday_column)?;
    let target = table.require_column(target_column)?;

    let mut weekday = Vec::new();
    let mut weekend = Vec::new();
    for (code, value) in codes.iter().zip(target) {
        let is_weekend = weekday_code(*code).is_some_and(|c| weekend_codes.contains(c));
        if is_weekend {
            weekend.push(*value);
        } else {
            weekday.push(*value);
        }
    }

    tracing::debug!(
        weekday_days = weekday.len(),
        weekend_days = weekend.len(),
        "split by weekend codes {}",
        weekend_codes
    );

    Ok(WeekendComparison {
        weekday: PartitionMean::from_values(false, &weekday),
        weekend: PartitionMean::from_values(true, &weekend),
    })
}

/// Interpret a numeric cell as a day-of-week code.
fn weekday_code(value: f64) -> Option<u8> {
    if value.fract() == 0.0 && (0.0..=6.0).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

// ── Monthly trend ─────────────────────────────────────────────────────────────

/// Sum of the target column over one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// `YYYY-MM`.
    pub month: String,
    pub total: f64,
    pub days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increased,
    Decreased,
}

/// Monthly totals for an inclusive date range, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub points: Vec<MonthlyTotal>,
}

impl MonthlyTrend {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&MonthlyTotal> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&MonthlyTotal> {
        self.points.last()
    }

    /// Compares only the first and last month. Anything but a strict increase
    /// reads as a decrease; `None` with fewer than two months.
    pub fn direction(&self) -> Option<TrendDirection> {
        if self.points.len() < 2 {
            return None;
        }
        let (first, last) = (self.first()?, self.last()?);
        Some(if last.total > first.total {
            TrendDirection::Increased
        } else {
            TrendDirection::Decreased
        })
    }

    pub fn max_total(&self) -> Option<f64> {
        stats::max(&self.points.iter().map(|p| p.total).collect::<Vec<_>>())
    }
}

/// Sum `target_column` per calendar month over rows whose date lies in
/// `[start, end]`.
///
/// `start > end` is an [`DashboardError::InvalidDateRange`]. A range that
/// matches no rows yields an empty trend.
pub fn monthly_sum(
    table: &RentalTable,
    date_column: &str,
    target_column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<MonthlyTrend> {
    ensure_ordered(start, end)?;
    let dates = table.require_dates(date_column)?;
    let target = table.require_column(target_column)?;

    // `YYYY-MM` keys sort chronologically.
    let mut months: BTreeMap<String, MonthlyTotal> = BTreeMap::new();
    for (date, value) in in_range(dates, target, start, end) {
        let key = date.format("%Y-%m").to_string();
        let entry = months.entry(key.clone()).or_insert_with(|| MonthlyTotal {
            month: key,
            total: 0.0,
            days: 0,
        });
        entry.total += value;
        entry.days += 1;
    }

    Ok(MonthlyTrend {
        start,
        end,
        points: months.into_values().collect(),
    })
}

// ── Summary metrics ───────────────────────────────────────────────────────────

/// Headline figures for the target column over a set of days.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub records: usize,
    pub total: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    /// Earliest and latest date covered; `None` when no rows matched.
    pub period: Option<(NaiveDate, NaiveDate)>,
}

impl SummaryMetrics {
    fn from_rows(rows: &[(NaiveDate, f64)]) -> Self {
        let values: Vec<f64> = rows.iter().map(|(_, v)| *v).collect();
        let period = rows
            .iter()
            .map(|(d, _)| *d)
            .min()
            .zip(rows.iter().map(|(d, _)| *d).max());
        Self {
            records: values.len(),
            total: values.iter().sum(),
            mean: stats::mean(&values),
            median: stats::median(&values),
            max: stats::max(&values),
            period,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Summary of `target_column` over the whole table.
pub fn summarize(table: &RentalTable, target_column: &str) -> Result<SummaryMetrics> {
    let target = table.require_column(target_column)?;
    let rows: Vec<(NaiveDate, f64)> = table.dates().iter().copied().zip(target.iter().copied()).collect();
    Ok(SummaryMetrics::from_rows(&rows))
}

/// Summary of `target_column` over rows dated within `[start, end]`.
pub fn summarize_range(
    table: &RentalTable,
    date_column: &str,
    target_column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SummaryMetrics> {
    ensure_ordered(start, end)?;
    let dates = table.require_dates(date_column)?;
    let target = table.require_column(target_column)?;
    let rows: Vec<(NaiveDate, f64)> = in_range(dates, target, start, end).collect();
    Ok(SummaryMetrics::from_rows(&rows))
}

// ── Private ───────────────────────────────────────────────────────────────────

fn ensure_ordered(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(DashboardError::InvalidDateRange { start, end });
    }
    Ok(())
}

fn in_range<'a>(
    dates: &'a [NaiveDate],
    values: &'a [f64],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = (NaiveDate, f64)> + 'a {
    dates
        .iter()
        .copied()
        .zip(values.iter().copied())
        .filter(move |(d, _)| *d >= start && *d <= end)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
