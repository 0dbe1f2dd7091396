//! Composite value index calculator
//!
//! Combines the stat and sentiment trends, plus a derived momentum measure,
//! into one normalized value record per player per day.

use crate::config::WeightConfig;
use crate::sentiment_trend::SentimentTrend;
use crate::signal::TrendOutcome;
use crate::stat_trend::StatTrend;
use chrono::NaiveDate;
use player_store::ValueIndexRecord;

/// Neutral prior written when neither signal has data
const NEUTRAL_VALUE: f64 = 50.0;

/// Assumed raw-score range rescaled into [0, 100]
const RAW_RANGE: f64 = 50.0;

/// Trend alignment measure. Reinforcing signals amplify, conflicting
/// signals dampen.
pub fn momentum_score(stat_trend: f64, sentiment_trend: f64) -> f64 {
    if stat_trend * sentiment_trend > 0.0 {
        (stat_trend + sentiment_trend).abs() * 1.5
    } else {
        (stat_trend + sentiment_trend) * 0.5
    }
}

fn normalize_to_100_scale(value: f64) -> f64 {
    let normalized = (value + RAW_RANGE) / (2.0 * RAW_RANGE) * 100.0;
    normalized.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Builds one `ValueIndexRecord` per player per cycle from the analyzer
/// outputs. Field rounding is fixed so same-day re-runs with unchanged
/// inputs produce byte-identical records.
pub struct CompositeCalculator {
    weights: WeightConfig,
}

impl CompositeCalculator {
    /// Create a new calculator
    pub fn new(weights: WeightConfig) -> Self {
        Self { weights }
    }

    /// Combine the analyzer outputs into the day's value record.
    pub fn build_record(
        &self,
        player_id: i64,
        value_date: NaiveDate,
        stat: &TrendOutcome<StatTrend>,
        sentiment: &TrendOutcome<SentimentTrend>,
    ) -> ValueIndexRecord {
        let stat = stat.metrics();
        let sentiment = sentiment.metrics();
        let momentum = momentum_score(stat.trend, sentiment.trend);

        // No data and zero-valued data share this sentinel on purpose;
        // downstream readers only see the neutral prior either way.
        let no_signal = stat.weighted_avg == 0.0 && sentiment.avg_sentiment == 0.0;

        let (value_score, confidence) = if no_signal {
            (NEUTRAL_VALUE, 0.0)
        } else {
            let raw_score = stat.weighted_avg * self.weights.stat
                + sentiment.avg_sentiment * self.weights.sentiment_scale * self.weights.sentiment
                + momentum * 10.0 * self.weights.momentum
                + stat.consistency * 20.0 * self.weights.consistency;

            let has_both_signals = stat.weighted_avg > 0.0 && sentiment.avg_sentiment != 0.0;
            let confidence = (stat.consistency * 0.4
                + sentiment.volume * 0.4
                + if has_both_signals { 0.2 } else { 0.0 })
            .min(1.0);

            (normalize_to_100_scale(raw_score), confidence)
        };

        ValueIndexRecord {
            player_id,
            value_date,
            value_score: round2(value_score),
            stat_component: round2(stat.weighted_avg),
            sentiment_component: round3(sentiment.avg_sentiment),
            momentum_score: round3(momentum),
            confidence_score: round3(confidence),
        }
    }
}
