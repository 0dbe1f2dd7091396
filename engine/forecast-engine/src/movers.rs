//! Mover detection
//!
//! Scans the recent value history across all players, ranks week-over-week
//! percentage change and attaches forecasts. Rising players become the
//! trending list; falling players become the drops list with a recovery
//! outlook and a buy signal.

use crate::config::MoverConfig;
use crate::manager::ForecastManager;
use crate::models::{TrendingPlayer, ValueDrop};
use crate::momentum::price_momentum;
use anyhow::Context;
use chrono::{Duration, NaiveDate};
use player_store::{ValueIndexRecord, ValueStore};
use std::collections::HashMap;
use tracing::{info, warn};

/// Window over which momentum context is pulled for trending reports
const MOMENTUM_WINDOW_DAYS: i64 = 14;

/// Week-over-week change for one player
struct WeeklyChange {
    player_id: i64,
    first_value: f64,
    last_value: f64,
    change_pct: f64,
}

/// Ranks movers over one storage handle
pub struct MoverDetector<S: ValueStore> {
    config: MoverConfig,
    store: S,
}

impl<S: ValueStore> MoverDetector<S> {
    /// Create a new detector
    pub fn new(config: MoverConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Find players whose value rose more than the change threshold over
    /// the scan window, strongest risers first.
    pub async fn find_trending(
        &self,
        manager: &mut ForecastManager<S>,
        limit: usize,
        as_of: NaiveDate,
    ) -> anyhow::Result<Vec<TrendingPlayer>> {
        let changes = self.weekly_changes(as_of).await?;

        let mut trending = Vec::new();
        for change in changes {
            if change.change_pct <= self.config.change_threshold_pct {
                continue;
            }

            let Some((meta, forecast)) = self
                .resolve_player(manager, change.player_id, as_of)
                .await
            else {
                continue;
            };

            let momentum_history = self
                .store
                .value_history(
                    change.player_id,
                    as_of - Duration::days(MOMENTUM_WINDOW_DAYS),
                )
                .await
                .unwrap_or_else(|e| {
                    warn!(
                        "Momentum history read failed for player {}: {}",
                        change.player_id, e
                    );
                    Vec::new()
                });

            trending.push(TrendingPlayer {
                player_id: change.player_id,
                player_name: meta.full_name,
                team: meta.team_name,
                position: meta.position,
                current_value: change.last_value,
                week_ago_value: change.first_value,
                change_pct: round2(change.change_pct),
                predicted_value: forecast.0,
                prediction_confidence: forecast.1,
                momentum: price_momentum(&momentum_history),
            });
        }

        trending.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
        trending.truncate(limit);

        info!("Found {} trending players", trending.len());
        Ok(trending)
    }

    /// Find players whose value fell more than the change threshold over
    /// the scan window, steepest drops first.
    pub async fn find_drops(
        &self,
        manager: &mut ForecastManager<S>,
        limit: usize,
        as_of: NaiveDate,
    ) -> anyhow::Result<Vec<ValueDrop>> {
        let changes = self.weekly_changes(as_of).await?;

        let mut drops = Vec::new();
        for change in changes {
            if change.change_pct >= -self.config.change_threshold_pct {
                continue;
            }

            let Some((meta, forecast)) = self
                .resolve_player(manager, change.player_id, as_of)
                .await
            else {
                continue;
            };

            let predicted_recovery = if change.last_value > 0.0 {
                round2((forecast.0 - change.last_value) / change.last_value * 100.0)
            } else {
                0.0
            };

            drops.push(ValueDrop {
                player_id: change.player_id,
                player_name: meta.full_name,
                team: meta.team_name,
                position: meta.position,
                current_value: change.last_value,
                week_ago_value: change.first_value,
                change_pct: round2(change.change_pct),
                predicted_value: forecast.0,
                prediction_confidence: forecast.1,
                predicted_recovery,
                buy_signal: predicted_recovery > self.config.recovery_threshold_pct,
            });
        }

        drops.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
        drops.truncate(limit);

        info!("Found {} value drops", drops.len());
        Ok(drops)
    }

    /// Week-over-week change for every player with enough rows in the
    /// scan window.
    async fn weekly_changes(&self, as_of: NaiveDate) -> anyhow::Result<Vec<WeeklyChange>> {
        let since = as_of - Duration::days(self.config.window_days);
        let records = self
            .store
            .value_history_all(since)
            .await
            .context("Failed to load value history for mover scan")?;

        let mut by_player: HashMap<i64, Vec<ValueIndexRecord>> = HashMap::new();
        for record in records {
            by_player.entry(record.player_id).or_default().push(record);
        }

        let mut changes = Vec::new();
        for (player_id, mut rows) in by_player {
            if rows.len() < self.config.min_points {
                continue;
            }
            rows.sort_by_key(|r| r.value_date);

            let first_value = rows[0].value_score;
            let last_value = rows[rows.len() - 1].value_score;
            let change_pct = if first_value > 0.0 {
                (last_value - first_value) / first_value * 100.0
            } else {
                0.0
            };

            changes.push(WeeklyChange { player_id, first_value, last_value, change_pct });
        }

        Ok(changes)
    }

    /// Roster metadata plus the end-of-horizon forecast for one mover.
    /// Players with missing metadata or an empty forecast are skipped.
    async fn resolve_player(
        &self,
        manager: &mut ForecastManager<S>,
        player_id: i64,
        as_of: NaiveDate,
    ) -> Option<(player_store::PlayerMeta, (f64, f64))> {
        let meta = match self.store.player_meta(player_id).await {
            Ok(Some(meta)) => meta,
            Ok(None) => {
                warn!("No roster metadata for player {}, skipping", player_id);
                return None;
            }
            Err(e) => {
                warn!("Metadata read failed for player {}: {}", player_id, e);
                return None;
            }
        };

        let forecast = manager
            .predict(player_id, self.config.forecast_days, as_of)
            .await;
        let last_point = forecast.last()?;

        Some((meta, (last_point.predicted_value, last_point.confidence)))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use player_store::{MemoryStore, PlayerMeta};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn meta(player_id: i64, name: &str) -> PlayerMeta {
        PlayerMeta {
            player_id,
            full_name: name.to_string(),
            team_name: "BOS".to_string(),
            position: "PF".to_string(),
        }
    }

    fn record(player_id: i64, day: u32, value_score: f64) -> ValueIndexRecord {
        ValueIndexRecord {
            player_id,
            value_date: date(day),
            value_score,
            stat_component: 20.0,
            sentiment_component: 0.2,
            momentum_score: 0.5,
            confidence_score: 0.6,
        }
    }

    async fn seed_series(store: &MemoryStore, player_id: i64, name: &str, values: &[f64]) {
        store.insert_player(meta(player_id, name)).await;
        let records: Vec<ValueIndexRecord> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| record(player_id, 8 + i as u32, v))
            .collect();
        store.upsert_value_index(&records).await.unwrap();
    }

    fn detector(store: MemoryStore) -> MoverDetector<MemoryStore> {
        MoverDetector::new(ForecastConfig::default().movers, store)
    }

    fn forecaster(store: MemoryStore) -> ForecastManager<MemoryStore> {
        ForecastManager::new(ForecastConfig::default().model, store)
    }

    #[tokio::test]
    async fn riser_appears_in_trending_only() {
        let store = MemoryStore::new();
        // +10% over the window: days 8..14, values 40 -> 44
        seed_series(&store, 1, "Randall Riser", &[40.0, 40.5, 41.0, 42.0, 43.0, 43.5, 44.0])
            .await;

        let detector = detector(store.clone());
        let mut manager = forecaster(store);

        let trending = detector.find_trending(&mut manager, 10, date(14)).await.unwrap();
        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].player_id, 1);
        assert_eq!(trending[0].current_value, 44.0);
        assert_eq!(trending[0].week_ago_value, 40.0);
        assert!((trending[0].change_pct - 10.0).abs() < 1e-9);

        let drops = detector.find_drops(&mut manager, 10, date(14)).await.unwrap();
        assert!(drops.is_empty());
    }

    #[tokio::test]
    async fn faller_appears_in_drops_with_consistent_buy_signal() {
        let store = MemoryStore::new();
        // -12% over the window
        seed_series(&store, 2, "Frank Faller", &[50.0, 49.0, 48.0, 47.0, 45.0, 44.5, 44.0])
            .await;

        let detector = detector(store.clone());
        let mut manager = forecaster(store);

        let drops = detector.find_drops(&mut manager, 10, date(14)).await.unwrap();
        assert_eq!(drops.len(), 1);
        let drop = &drops[0];
        assert_eq!(drop.player_id, 2);
        assert!(drop.change_pct < -3.0);
        assert!(drop.predicted_value >= 0.0 && drop.predicted_value <= 100.0);
        assert_eq!(drop.buy_signal, drop.predicted_recovery > 2.0);

        let trending = detector.find_trending(&mut manager, 10, date(14)).await.unwrap();
        assert!(trending.is_empty());
    }

    #[tokio::test]
    async fn boundary_change_is_excluded_from_both_lists() {
        let store = MemoryStore::new();
        // exactly +3% over the window
        seed_series(&store, 3, "Barry Boundary", &[100.0, 100.5, 101.0, 102.0, 103.0]).await;
        // well inside the stable band
        seed_series(&store, 4, "Steady Stan", &[60.0, 60.2, 60.1, 60.3, 60.2]).await;

        let detector = detector(store.clone());
        let mut manager = forecaster(store);

        let trending = detector.find_trending(&mut manager, 10, date(14)).await.unwrap();
        let drops = detector.find_drops(&mut manager, 10, date(14)).await.unwrap();
        assert!(trending.is_empty());
        assert!(drops.is_empty());
    }

    #[tokio::test]
    async fn sparse_history_is_ignored() {
        let store = MemoryStore::new();
        store.insert_player(meta(5, "Pat Partial")).await;
        // only 3 rows in the window, below the 5-point minimum
        let records =
            vec![record(5, 12, 40.0), record(5, 13, 45.0), record(5, 14, 50.0)];
        store.upsert_value_index(&records).await.unwrap();

        let detector = detector(store.clone());
        let mut manager = forecaster(store);

        let trending = detector.find_trending(&mut manager, 10, date(14)).await.unwrap();
        assert!(trending.is_empty());
    }

    #[tokio::test]
    async fn trending_is_sorted_by_change_and_truncated() {
        let store = MemoryStore::new();
        seed_series(&store, 1, "Small Gain", &[50.0, 50.5, 51.0, 51.5, 52.5]).await; // +5%
        seed_series(&store, 2, "Big Gain", &[40.0, 42.0, 44.0, 46.0, 48.0]).await; // +20%
        seed_series(&store, 3, "Mid Gain", &[60.0, 61.0, 62.0, 64.0, 66.0]).await; // +10%

        let detector = detector(store.clone());
        let mut manager = forecaster(store);

        let trending = detector.find_trending(&mut manager, 2, date(14)).await.unwrap();
        assert_eq!(trending.len(), 2);
        assert_eq!(trending[0].player_id, 2);
        assert_eq!(trending[1].player_id, 3);
    }
}
