//! Stat trend analyzer
//!
//! Converts a player's recent boxscores into a recency-weighted fantasy
//! average, a trend direction and a consistency measure.

use crate::signal::TrendOutcome;
use player_store::StatRecord;

/// Metrics derived from a player's recent boxscores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatTrend {
    /// Exponentially recency-weighted fantasy average
    pub weighted_avg: f64,
    /// Normalized recent-vs-older difference; positive when improving
    pub trend: f64,
    /// 1 / (1 + stddev); higher when output is stable
    pub consistency: f64,
}

/// Fantasy score for one game:
/// pts + 1.2*reb + 1.5*ast + 3*stl + 3*blk - tov
pub fn fantasy_score(stats: &StatRecord) -> f64 {
    stats.points as f64
        + stats.rebounds as f64 * 1.2
        + stats.assists as f64 * 1.5
        + stats.steals as f64 * 3.0
        + stats.blocks as f64 * 3.0
        - stats.turnovers as f64
}

/// Analyze a player's boxscores, ordered ascending by game date.
///
/// Fewer than two games is not enough to call a trend; the caller treats
/// that as a valid "no signal" state, never a failure.
pub fn analyze(records: &[StatRecord]) -> TrendOutcome<StatTrend> {
    if records.len() < 2 {
        return TrendOutcome::NoData;
    }

    let scores: Vec<f64> = records.iter().map(fantasy_score).collect();

    TrendOutcome::Computed(StatTrend {
        weighted_avg: recency_weighted_mean(&scores),
        trend: recent_vs_older_trend(&scores),
        consistency: 1.0 / (1.0 + std_dev(&scores)),
    })
}

/// Exponential ramp from weight 1 on the oldest game to e on the newest.
fn recency_weighted_mean(scores: &[f64]) -> f64 {
    let span = (scores.len() - 1) as f64;
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, &score) in scores.iter().enumerate() {
        let weight = (i as f64 / span).exp();
        weighted_sum += weight * score;
        weight_sum += weight;
    }
    weighted_sum / weight_sum
}

/// Mean of the 3 most recent scores vs the mean of the remainder, normalized
/// by (older mean + 1). Zero when fewer than 3 scores exist or the
/// denominator degenerates.
fn recent_vs_older_trend(scores: &[f64]) -> f64 {
    if scores.len() < 3 {
        return 0.0;
    }

    let split = scores.len() - 3;
    let recent_avg = mean(&scores[split..]);
    let older_avg = if split == 0 { recent_avg } else { mean(&scores[..split]) };

    let denominator = older_avg + 1.0;
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }

    (recent_avg - older_avg) / denominator
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
