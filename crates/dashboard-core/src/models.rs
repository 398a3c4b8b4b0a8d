use crate::error::{DashboardError, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Published location of the daily bike sharing dataset.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/Ifdhal17/assignment-bangkit/refs/heads/main/day.csv";

/// Name of the date column in the dataset.
pub const DATE_COLUMN: &str = "dteday";

/// Name of the day-of-week code column.
pub const WEEKDAY_COLUMN: &str = "weekday";

/// Default column that every aggregation is computed against.
pub const DEFAULT_TARGET_COLUMN: &str = "cnt";

/// Textual format of `dteday` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ── DataSource ─────────────────────────────────────────────────────────────────

/// Where the rental dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Remote CSV fetched with an unauthenticated GET.
    Url(String),
    /// CSV on the local filesystem.
    File(PathBuf),
}

impl DataSource {
    /// Interpret a user-supplied location. Anything starting with
    /// `http://` or `https://` is a URL, everything else a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_SOURCE_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── RentalRecord ───────────────────────────────────────────────────────────────

/// One row of the daily dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Row index carried by the published file; absent in trimmed copies.
    #[serde(default)]
    pub instant: Option<u32>,
    pub dteday: NaiveDate,
    /// 1 = spring, 2 = summer, 3 = fall, 4 = winter.
    pub season: u8,
    /// 0 = 2011, 1 = 2012.
    pub yr: u8,
    pub mnth: u8,
    pub holiday: u8,
    /// Day-of-week code, 0..=6.
    pub weekday: u8,
    pub workingday: u8,
    /// 1 = clear ... 4 = heavy rain / snow.
    pub weathersit: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

impl RentalRecord {
    /// Numeric columns in source order, excluding the optional `instant`.
    pub const NUMERIC_COLUMNS: [&'static str; 14] = [
        "season",
        "yr",
        "mnth",
        "holiday",
        "weekday",
        "workingday",
        "weathersit",
        "temp",
        "atemp",
        "hum",
        "windspeed",
        "casual",
        "registered",
        "cnt",
    ];

    /// `true` when `cnt == casual + registered`.
    pub fn totals_consistent(&self) -> bool {
        u64::from(self.casual) + u64::from(self.registered) == u64::from(self.cnt)
    }

    /// Values of [`Self::NUMERIC_COLUMNS`] in the same order.
    pub fn numeric_values(&self) -> [f64; 14] {
        [
            f64::from(self.season),
            f64::from(self.yr),
            f64::from(self.mnth),
            f64::from(self.holiday),
            f64::from(self.weekday),
            f64::from(self.workingday),
            f64::from(self.weathersit),
            self.temp,
            self.atemp,
            self.hum,
            self.windspeed,
            f64::from(self.casual),
            f64::from(self.registered),
            f64::from(self.cnt),
        ]
    }
}

// ── RentalTable ────────────────────────────────────────────────────────────────

/// A named column of numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Column-oriented, read-only view of the dataset.
///
/// Holds one date column and any number of numeric columns, all of the same
/// length, in source order. Aggregations address columns by name.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalTable {
    date_column: String,
    dates: Vec<NaiveDate>,
    columns: Vec<NumericColumn>,
}

impl RentalTable {
    /// Build a table from a date column and numeric columns.
    ///
    /// Every numeric column must have exactly one value per date.
    pub fn new(
        date_column: impl Into<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<NumericColumn>,
    ) -> Result<Self> {
        let expected = dates.len();
        if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
            return Err(DashboardError::ColumnLength {
                column: bad.name.clone(),
                expected,
                actual: bad.values.len(),
            });
        }
        Ok(Self {
            date_column: date_column.into(),
            dates,
            columns,
        })
    }

    /// Build the columnar form of validated records.
    ///
    /// `instant` becomes the first numeric column only when every record
    /// carries it.
    pub fn from_records(records: &[RentalRecord]) -> Self {
        let mut columns: Vec<NumericColumn> = Vec::with_capacity(15);

        if !records.is_empty() && records.iter().all(|r| r.instant.is_some()) {
            let values = records
                .iter()
                .map(|r| r.instant.map(f64::from).unwrap_or_default())
                .collect();
            columns.push(NumericColumn::new("instant", values));
        }

        let mut fixed: Vec<Vec<f64>> =
            vec![Vec::with_capacity(records.len()); RentalRecord::NUMERIC_COLUMNS.len()];
        for record in records {
            for (slot, value) in fixed.iter_mut().zip(record.numeric_values()) {
                slot.push(value);
            }
        }
        columns.extend(
            RentalRecord::NUMERIC_COLUMNS
                .iter()
                .zip(fixed)
                .map(|(name, values)| NumericColumn::new(*name, values)),
        );

        Self {
            date_column: DATE_COLUMN.to_string(),
            dates: records.iter().map(|r| r.dteday).collect(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[NumericColumn] {
        &self.columns
    }

    /// Names of all numeric columns in source order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the named numeric column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Like [`Self::column`] but returns [`DashboardError::UnknownColumn`] when absent.
    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| DashboardError::UnknownColumn(name.to_string()))
    }

    /// Resolve `name` as the date column.
    pub fn require_dates(&self, name: &str) -> Result<&[NaiveDate]> {
        if name == self.date_column {
            Ok(&self.dates)
        } else {
            Err(DashboardError::UnknownColumn(name.to_string()))
        }
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.dates.iter().min()?;
        let max = self.dates.iter().max()?;
        Some((*min, *max))
    }
}

// ── Weekend mapping ────────────────────────────────────────────────────────────

/// Day-of-week codes counted as weekend days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendCodes(BTreeSet<u8>);

impl WeekendCodes {
    /// Build from explicit codes; every code must be in `0..=6`.
    pub fn new(codes: impl IntoIterator<Item = u8>) -> Result<Self> {
        let set: BTreeSet<u8> = codes.into_iter().collect();
        if let Some(bad) = set.iter().find(|&&c| c > 6) {
            return Err(DashboardError::InvalidWeekendCodes(format!(
                "code {} is outside 0..=6",
                bad
            )));
        }
        Ok(Self(set))
    }

    pub fn contains(&self, code: u8) -> bool {
        self.0.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WeekendCodes {
    fn default() -> Self {
        Self(BTreeSet::from([5, 6]))
    }
}

impl FromStr for WeekendCodes {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let mut codes = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let code = part
                .parse::<u8>()
                .map_err(|_| DashboardError::InvalidWeekendCodes(format!("'{}'", part)))?;
            codes.push(code);
        }
        Self::new(codes)
    }
}

impl fmt::Display for WeekendCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u8::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// How day-of-week codes map onto named days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekdayConvention {
    /// 0 = Sunday ... 6 = Saturday.
    #[default]
    SundayZero,
    /// 0 = Monday ... 6 = Sunday.
    MondayZero,
}

impl WeekdayConvention {
    /// Position of `code` in a Sunday-first week (0 = Sunday), or `None` for
    /// codes outside `0..=6`.
    pub fn sunday_index(self, code: u8) -> Option<usize> {
        if code > 6 {
            return None;
        }
        let index = match self {
            WeekdayConvention::SundayZero => code,
            WeekdayConvention::MondayZero => (code + 1) % 7,
        };
        Some(usize::from(index))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekdayConvention::SundayZero => "sunday-zero",
            WeekdayConvention::MondayZero => "monday-zero",
        }
    }
}

impl FromStr for WeekdayConvention {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sunday-zero" => Ok(WeekdayConvention::SundayZero),
            "monday-zero" => Ok(WeekdayConvention::MondayZero),
            other => Err(DashboardError::Config(format!(
                "unknown weekday convention '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for WeekdayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DateRangeSelection ─────────────────────────────────────────────────────────

/// Which end of a date range an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEndpoint {
    Start,
    End,
}

impl RangeEndpoint {
    pub fn toggle(self) -> Self {
        match self {
            RangeEndpoint::Start => RangeEndpoint::End,
            RangeEndpoint::End => RangeEndpoint::Start,
        }
    }
}

/// Start/end dates picked by the user, each clamped to the dataset bounds.
///
/// The two endpoints move independently, so `start > end` is representable;
/// [`Self::is_valid`] reports it and the trend view treats it as an input
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeSelection {
    start: NaiveDate,
    end: NaiveDate,
    min: NaiveDate,
    max: NaiveDate,
}

impl DateRangeSelection {
    /// Selection covering the whole `[min, max]` range.
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            start: min,
            end: max,
            min,
            max,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.min, self.max)
    }

    pub fn get(&self, endpoint: RangeEndpoint) -> NaiveDate {
        match endpoint {
            RangeEndpoint::Start => self.start,
            RangeEndpoint::End => self.end,
        }
    }

    /// `false` when start is after end.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Set an endpoint, clamped to the dataset bounds.
    pub fn set(&mut self, endpoint: RangeEndpoint, date: NaiveDate) {
        let clamped = date.clamp(self.min, self.max);
        match endpoint {
            RangeEndpoint::Start => self.start = clamped,
            RangeEndpoint::End => self.end = clamped,
        }
    }

    /// Move an endpoint by whole days.
    pub fn shift_days(&mut self, endpoint: RangeEndpoint, days: i64) {
        let current = self.get(endpoint);
        let moved = current
            .checked_add_signed(chrono::Duration::days(days))
            .unwrap_or(if days < 0 { self.min } else { self.max });
        self.set(endpoint, moved);
    }

    /// Move an endpoint by calendar months. Day-of-month is clamped to the
    /// target month's length.
    pub fn shift_months(&mut self, endpoint: RangeEndpoint, months: i32) {
        let current = self.get(endpoint);
        let step = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            current.checked_add_months(step).unwrap_or(self.max)
        } else {
            current.checked_sub_months(step).unwrap_or(self.min)
        };
        self.set(endpoint, moved);
    }

    /// Jump an endpoint to the earliest dataset date.
    pub fn jump_to_min(&mut self, endpoint: RangeEndpoint) {
        self.set(endpoint, self.min);
    }

    /// Jump an endpoint to the latest dataset date.
    pub fn jump_to_max(&mut self, endpoint: RangeEndpoint) {
        self.set(endpoint, self.max);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
