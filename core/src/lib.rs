//! AdPulse core — marketing performance and profitability metrics.
//!
//! Joins daily business results with marketing-channel activity, derives
//! ratio KPIs with explicit undefined values, aggregates and ranks
//! channels / campaigns / tactics, and reduces everything to headline
//! numbers and descriptive insights. Pure functions throughout.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod insight;
pub mod join;
pub mod pipeline;
pub mod rank;
pub mod ratio;
pub mod record;
pub mod schema;
pub mod summary;
pub mod types;
