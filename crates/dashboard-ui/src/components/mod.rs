//! Small line-oriented building blocks shared by the dashboard panels.

pub mod date_picker;
pub mod header;
pub mod metrics;
