//! Price momentum over a player's recent value history

use player_store::ValueIndexRecord;
use serde::Serialize;

/// Rows needed before momentum says anything
const MIN_HISTORY: usize = 7;

/// Classified direction of the recent value trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    StrongUpward,
    Upward,
    Stable,
    Downward,
    StrongDownward,
    /// Not enough history to classify
    Unknown,
}

/// Momentum summary for a player's recent value history
#[derive(Debug, Clone, Serialize)]
pub struct PriceMomentum {
    /// Recent-vs-older percentage change
    pub trend_pct: f64,
    /// Mean day-over-day change
    pub momentum: f64,
    /// Standard deviation of the value series
    pub volatility: f64,
    pub direction: TrendDirection,
    pub current_value: f64,
    pub week_ago_value: f64,
}

impl PriceMomentum {
    /// Sentinel for players without enough history
    pub fn insufficient_data() -> Self {
        Self {
            trend_pct: 0.0,
            momentum: 0.0,
            volatility: 0.0,
            direction: TrendDirection::Unknown,
            current_value: 0.0,
            week_ago_value: 0.0,
        }
    }
}

/// Summarize momentum from value history ordered ascending by date.
pub fn price_momentum(history: &[ValueIndexRecord]) -> PriceMomentum {
    if history.len() < MIN_HISTORY {
        return PriceMomentum::insufficient_data();
    }

    let values: Vec<f64> = history.iter().map(|r| r.value_score).collect();

    let recent_avg = mean(&values[values.len() - 3..]);
    let older_avg = mean(&values[..3]);
    let trend_pct = if older_avg > 0.0 {
        round2((recent_avg - older_avg) / older_avg * 100.0)
    } else {
        0.0
    };

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let direction = if trend_pct > 5.0 {
        TrendDirection::StrongUpward
    } else if trend_pct > 2.0 {
        TrendDirection::Upward
    } else if trend_pct < -5.0 {
        TrendDirection::StrongDownward
    } else if trend_pct < -2.0 {
        TrendDirection::Downward
    } else {
        TrendDirection::Stable
    };

    PriceMomentum {
        trend_pct,
        momentum: round3(mean(&diffs)),
        volatility: round2(std_dev(&values)),
        direction,
        current_value: values[values.len() - 1],
        week_ago_value: values[0],
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
