//! Score aggregation for Verdant.
//!
//! Converts a company's attributed, classified documents over a lookback
//! window into time-windowed, sector-weighted E/S/G and composite scores,
//! and appends the result to the score series.

pub mod aggregator;
pub mod error;

pub use aggregator::ScoreAggregator;
pub use error::{Error, Result};
