//! Core types shared by every dashboard crate: the rental data model, error
//! types, CLI settings, number formatting and descriptive statistics.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{DashboardError, DataLoadError, Result};
pub use models::{
    DataSource, DateRangeSelection, NumericColumn, RangeEndpoint, RentalRecord, RentalTable,
    WeekdayConvention, WeekendCodes,
};
