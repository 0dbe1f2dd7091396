//! Composite Value Index Engine
//!
//! Turns raw per-game stats and per-mention sentiment into one normalized
//! 0-100 value record per player per day: a stat trend, a sentiment trend,
//! a momentum measure of how the two align, and a confidence score for how
//! much real data backs the result.

pub mod composite;
pub mod config;
pub mod pipeline;
pub mod sentiment_trend;
pub mod signal;
pub mod stat_trend;

pub use composite::CompositeCalculator;
pub use config::ValueIndexConfig;
pub use pipeline::{ValueIndexEvent, ValueIndexPipeline};
pub use sentiment_trend::SentimentTrend;
pub use signal::TrendOutcome;
pub use stat_trend::StatTrend;
