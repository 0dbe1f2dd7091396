//! Forecast model manager
//!
//! Owns one fitted regression per player, trained lazily from that player's
//! value history and replaced on retrain. Insufficient data and degenerate
//! fits surface as an empty forecast, never as an error.

use crate::config::ModelConfig;
use crate::models::ForecastPoint;
use crate::regression::{fit_ols, OlsModel};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use player_store::{ValueIndexRecord, ValueStore};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A fitted model and the state needed to roll it forward
struct TrainedModel {
    model: OlsModel,
    last_index: usize,
    last_row: ValueIndexRecord,
    history_len: usize,
    fitted_at: DateTime<Utc>,
}

/// Per-player model cache over one storage handle. Private to a run; a
/// cached model lives until `invalidate` or a retrain replaces it.
pub struct ForecastManager<S: ValueStore> {
    config: ModelConfig,
    store: S,
    models: HashMap<i64, TrainedModel>,
}

impl<S: ValueStore> ForecastManager<S> {
    /// Create a new manager with an empty cache
    pub fn new(config: ModelConfig, store: S) -> Self {
        Self { config, store, models: HashMap::new() }
    }

    /// Train a model for one player from its recent value history.
    /// Returns false when the history is too short or the fit degenerates.
    pub async fn train(&mut self, player_id: i64, as_of: NaiveDate) -> bool {
        let since = as_of - Duration::days(self.config.history_days);
        let history = match self.store.value_history(player_id, since).await {
            Ok(history) => history,
            Err(e) => {
                warn!("Value history read failed for player {}: {}", player_id, e);
                Vec::new()
            }
        };

        if history.len() < self.config.min_training_points {
            debug!(
                "Player {} has {} history rows, need {}",
                player_id,
                history.len(),
                self.config.min_training_points
            );
            return false;
        }

        let (rows, targets) = build_features(&history);
        let Some(model) = fit_ols(&rows, &targets) else {
            warn!("Degenerate regression fit for player {}", player_id);
            return false;
        };

        let last_row = history[history.len() - 1].clone();
        self.models.insert(
            player_id,
            TrainedModel {
                model,
                last_index: history.len() - 1,
                last_row,
                history_len: history.len(),
                fitted_at: Utc::now(),
            },
        );

        true
    }

    /// Evict a player's cached model; the next predict retrains.
    pub fn invalidate(&mut self, player_id: i64) -> bool {
        self.models.remove(&player_id).is_some()
    }

    /// Whether a trained model is currently cached for the player
    pub fn is_trained(&self, player_id: i64) -> bool {
        self.models.contains_key(&player_id)
    }

    /// When the player's cached model was fitted
    pub fn fitted_at(&self, player_id: i64) -> Option<DateTime<Utc>> {
        self.models.get(&player_id).map(|m| m.fitted_at)
    }

    /// Forecast the player's value for each of the next `days_ahead` days.
    ///
    /// Future drivers are frozen at the last observed component values;
    /// only the time index advances. Untrainable players yield an empty
    /// forecast.
    pub async fn predict(
        &mut self,
        player_id: i64,
        days_ahead: u32,
        as_of: NaiveDate,
    ) -> Vec<ForecastPoint> {
        if !self.models.contains_key(&player_id) && !self.train(player_id, as_of).await {
            return Vec::new();
        }

        let trained = &self.models[&player_id];
        let last = &trained.last_row;

        let mut forecast = Vec::with_capacity(days_ahead as usize);
        for day in 1..=days_ahead {
            let features = [
                (trained.last_index + day as usize) as f64,
                last.stat_component,
                last.sentiment_component,
                last.momentum_score,
                last.confidence_score,
                last.value_score,
            ];
            let predicted = trained.model.predict(&features).clamp(0.0, 100.0);

            forecast.push(ForecastPoint {
                date: as_of + Duration::days(day as i64),
                predicted_value: round2(predicted),
                confidence: self.prediction_confidence(day, trained.history_len),
                days_ahead: day,
            });
        }

        forecast
    }

    /// Confidence decays linearly over the horizon and scales with the
    /// amount of history behind the model.
    fn prediction_confidence(&self, days_ahead: u32, data_points: usize) -> f64 {
        let time_factor =
            (1.0 - days_ahead as f64 / self.config.confidence_horizon_days as f64).max(0.0);
        let data_factor =
            (data_points as f64 / self.config.confidence_history_cap_days as f64).min(1.0);
        round3(time_factor * data_factor)
    }
}

/// Feature rows for the regression: time index, the record's components,
/// and a trailing 3-point moving average of the value score (the point's
/// own value when fewer than 3 prior points exist).
fn build_features(history: &[ValueIndexRecord]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rows = Vec::with_capacity(history.len());
    let mut targets = Vec::with_capacity(history.len());

    for (i, record) in history.iter().enumerate() {
        let moving_avg = if i >= 3 {
            history[i - 3..i]
                .iter()
                .map(|r| r.value_score)
                .sum::<f64>()
                / 3.0
        } else {
            record.value_score
        };

        rows.push(vec![
            i as f64,
            record.stat_component,
            record.sentiment_component,
            record.momentum_score,
            record.confidence_score,
            moving_avg,
        ]);
        targets.push(record.value_score);
    }

    (rows, targets)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
