//! Data layer for the bike rental dashboard.
//!
//! Loads the daily CSV into a [`RentalTable`](dashboard_core::RentalTable),
//! and computes the correlation, weekday/weekend and monthly trend
//! aggregations the dashboard renders.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use dashboard_core as core;
