//! Feature correlation and the whole-dataset analysis pipeline.
//!
//! [`analyze_dataset`] runs every aggregation that depends only on the full
//! table (correlations, weekend comparison, summary), returning an
//! [`DatasetOverview`] ready for the UI layer.

use std::cmp::Ordering;

use dashboard_core::error::{DataLoadError, Result};
use dashboard_core::models::{RentalTable, WeekendCodes};
use dashboard_core::stats::pearson;
use tracing::debug;

use crate::aggregator::{average_by_weekend_flag, summarize, SummaryMetrics, WeekendComparison};

// ── Correlation ───────────────────────────────────────────────────────────────

/// Pearson correlation of one numeric column against the target.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCorrelation {
    pub feature: String,
    /// `None` when either column has zero variance.
    pub coefficient: Option<f64>,
}

impl FeatureCorrelation {
    pub fn is_positive(&self) -> bool {
        self.coefficient.is_some_and(|c| c > 0.0)
    }
}

/// Correlate every numeric column except `target_column` with it, ordered by
/// coefficient from highest to lowest. Undefined coefficients sort last.
///
/// A table with fewer than two numeric columns has nothing to correlate and
/// yields an empty list.
pub fn correlate_with_target(
    table: &RentalTable,
    target_column: &str,
) -> Result<Vec<FeatureCorrelation>> {
    if table.columns().len() < 2 {
        return Ok(Vec::new());
    }
    let target = table.require_column(target_column)?;

    let mut correlations: Vec<FeatureCorrelation> = table
        .columns()
        .iter()
        .filter(|c| c.name != target_column)
        .map(|c| FeatureCorrelation {
            feature: c.name.clone(),
            coefficient: pearson(&c.values, target),
        })
        .collect();

    correlations.sort_by(|a, b| descending_nan_last(a.coefficient, b.coefficient));

    debug!(
        features = correlations.len(),
        undefined = correlations.iter().filter(|c| c.coefficient.is_none()).count(),
        "correlated with {}",
        target_column
    );
    Ok(correlations)
}

/// The highest defined coefficient, whatever its sign.
pub fn strongest_factor(correlations: &[FeatureCorrelation]) -> Option<&FeatureCorrelation> {
    correlations.iter().find(|c| c.coefficient.is_some())
}

fn descending_nan_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Every view computed from the full table, independent of the date range.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOverview {
    pub target_column: String,
    pub correlations: Vec<FeatureCorrelation>,
    pub weekend: WeekendComparison,
    pub summary: SummaryMetrics,
}

/// Run the date-independent aggregations over `table`.
pub fn analyze_dataset(
    table: &RentalTable,
    weekday_column: &str,
    target_column: &str,
    weekend_codes: &WeekendCodes,
) -> Result<DatasetOverview> {
    if table.is_empty() {
        return Err(DataLoadError::Empty.into());
    }

    let started = std::time::Instant::now();
    let correlations = correlate_with_target(table, target_column)?;
    let weekend = average_by_weekend_flag(table, weekday_column, target_column, weekend_codes)?;
    let summary = summarize(table, target_column)?;
    debug!(
        "analyzed {} rows in {:.1}ms",
        table.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    Ok(DatasetOverview {
        target_column: target_column.to_string(),
        correlations,
        weekend,
        summary,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
