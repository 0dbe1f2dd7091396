use crate::momentum::PriceMomentum;
use chrono::NaiveDate;
use serde::Serialize;

/// One forecasted day for a player
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted value score, clamped to [0, 100]
    pub predicted_value: f64,
    /// Decays with horizon, grows with history length; in [0, 1]
    pub confidence: f64,
    pub days_ahead: u32,
}

/// A player whose value rose enough week-over-week to be flagged
#[derive(Debug, Clone, Serialize)]
pub struct TrendingPlayer {
    pub player_id: i64,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub current_value: f64,
    pub week_ago_value: f64,
    pub change_pct: f64,
    pub predicted_value: f64,
    pub prediction_confidence: f64,
    pub momentum: PriceMomentum,
}

/// A player whose value dropped enough week-over-week to be flagged,
/// with a recovery outlook
#[derive(Debug, Clone, Serialize)]
pub struct ValueDrop {
    pub player_id: i64,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub current_value: f64,
    pub week_ago_value: f64,
    pub change_pct: f64,
    pub predicted_value: f64,
    pub prediction_confidence: f64,
    /// Forecasted bounce from the current value, as a percentage
    pub predicted_recovery: f64,
    /// True when the predicted recovery clears the configured threshold
    pub buy_signal: bool,
}
