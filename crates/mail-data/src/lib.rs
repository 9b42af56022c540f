//! Data layer for the mail summary.
//!
//! Loads the email event log, expands recipient lists, counts messages per
//! person and builds the cumulative time series used by the charts.

pub mod aggregator;
pub mod analysis;
pub mod expander;
pub mod reader;
pub mod timeseries;

pub use mail_core as core;
