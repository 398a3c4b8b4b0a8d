//! Terminal UI layer for the bike rental dashboard.
//!
//! Provides themes, label sets, the correlation / weekday-weekend / trend
//! panels, a plain-text report renderer and the main application event loop
//! built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod correlation_view;
pub mod dashboard_view;
pub mod labels;
pub mod report;
pub mod themes;
pub mod trend_view;
pub mod weekend_view;

pub use dashboard_core as core;
