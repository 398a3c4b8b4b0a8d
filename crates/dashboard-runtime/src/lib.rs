//! Runtime layer for the bike rental dashboard.
//!
//! Owns the dataset cache, the background loader and the per-session state
//! that sits between the data layer and the UI.

pub mod dataset_cache;
pub mod orchestrator;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
