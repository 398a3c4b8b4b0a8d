use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while fetching, parsing or validating the rental dataset.
///
/// Any of these is fatal for the render pass that triggered the load: the
/// dashboard reports the message and draws no charts until a refresh succeeds.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The remote resource could not be fetched (network error or non-success status).
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// A local dataset file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV was malformed or did not have the expected columns.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A `dteday` value was not a `YYYY-MM-DD` date.
    #[error("Invalid date {value:?} in row {row}")]
    DateParse { row: usize, value: String },

    /// `cnt` did not equal `casual + registered`.
    #[error(
        "Inconsistent totals in row {row} ({date}): cnt {total} != casual {casual} + registered {registered}"
    )]
    InconsistentTotals {
        row: usize,
        date: NaiveDate,
        casual: u32,
        registered: u32,
        total: u32,
    },

    /// The resource parsed cleanly but held no rows.
    #[error("Dataset contains no rows")]
    Empty,
}

/// All errors produced by the bike rental dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset could not be loaded.
    #[error("Error loading data: {0}")]
    DataLoad(#[from] DataLoadError),

    /// An operation referred to a column the table does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A column was built with a different number of values than the table has rows.
    #[error("Column {column} has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The selected start date is after the selected end date.
    #[error("Start date {start} cannot be later than end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A weekend code list could not be parsed.
    #[error("Invalid weekend codes: {0}")]
    InvalidWeekendCodes(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// `true` for errors caused by user input rather than by the data or the system.
    pub fn is_input_error(&self) -> bool {
        matches!(self, DashboardError::InvalidDateRange { .. })
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_error_display_fetch() {
        let err = DataLoadError::Fetch {
            url: "https://example.com/day.csv".to_string(),
            message: "HTTP status 404 Not Found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/day.csv"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DataLoadError::FileRead {
            path: PathBuf::from("/data/day.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/day.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = DataLoadError::DateParse {
            row: 3,
            value: "2011/01/03".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid date \"2011/01/03\" in row 3");
    }

    #[test]
    fn test_error_display_inconsistent_totals() {
        let err = DataLoadError::InconsistentTotals {
            row: 1,
            date: date(2011, 1, 1),
            casual: 331,
            registered: 654,
            total: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("2011-01-01"));
        assert!(msg.contains("cnt 1000"));
    }

    #[test]
    fn test_data_load_error_wraps_into_dashboard_error() {
        let err: DashboardError = DataLoadError::Empty.into();
        assert_eq!(err.to_string(), "Error loading data: Dataset contains no rows");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_invalid_date_range_is_input_error() {
        let err = DashboardError::InvalidDateRange {
            start: date(2012, 2, 1),
            end: date(2012, 1, 1),
        };
        assert!(err.is_input_error());
        assert_eq!(
            err.to_string(),
            "Start date 2012-02-01 cannot be later than end date 2012-01-01"
        );
    }

    #[test]
    fn test_error_display_unknown_column() {
        let err = DashboardError::UnknownColumn("rides".to_string());
        assert_eq!(err.to_string(), "Unknown column: rides");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("bad source".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad source");
    }
}
