//! Daily batch pipeline
//!
//! Iterates the roster sequentially, scores each player for the target date
//! and writes the batch with a keyed upsert. One player's storage failure
//! degrades that player to the no-data path; it never aborts the cycle.

use crate::composite::CompositeCalculator;
use crate::config::ValueIndexConfig;
use crate::{sentiment_trend, stat_trend};
use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use player_store::ValueStore;
use serde::Serialize;
use tracing::{error, info, warn};

/// Events emitted by a pipeline cycle
#[derive(Debug, Clone, Serialize)]
pub enum ValueIndexEvent {
    /// A player was scored for the target date
    PlayerScored {
        player_id: i64,
        value_score: f64,
        confidence_score: f64,
        timestamp: DateTime<Utc>,
    },

    /// A storage read failed and the player degraded to the no-data path
    PlayerDegraded {
        player_id: i64,
        input: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Cycle finished
    BatchCompleted {
        processed: usize,
        written: usize,
        degraded: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Batch pipeline over one storage handle
pub struct ValueIndexPipeline<S: ValueStore> {
    config: ValueIndexConfig,
    calculator: CompositeCalculator,
    store: S,
}

impl<S: ValueStore> ValueIndexPipeline<S> {
    /// Create a new pipeline
    pub fn new(config: ValueIndexConfig, store: S) -> Self {
        let calculator = CompositeCalculator::new(config.weights.clone());
        Self { config, calculator, store }
    }

    /// Run one processing cycle for the given date. Re-running the same day
    /// is idempotent: writes are keyed upserts on (player_id, value_date).
    pub async fn run_cycle(&self, as_of: NaiveDate) -> anyhow::Result<Vec<ValueIndexEvent>> {
        info!("Starting value index cycle for {}", as_of);

        let players = self
            .store
            .list_players()
            .await
            .context("Failed to load player roster")?;

        if players.is_empty() {
            warn!("No players to process");
            return Ok(vec![ValueIndexEvent::BatchCompleted {
                processed: 0,
                written: 0,
                degraded: 0,
                timestamp: Utc::now(),
            }]);
        }

        info!("Processing {} players", players.len());

        let stat_since = as_of - Duration::days(self.config.window.stat_lookback_days);
        let sentiment_since = as_of - Duration::days(self.config.window.sentiment_lookback_days);

        let mut events = Vec::new();
        let mut records = Vec::with_capacity(players.len());
        let mut degraded = 0;

        for player in &players {
            let mut player_degraded = false;

            let stats = match self.store.stats_since(player.player_id, stat_since).await {
                Ok(stats) => stats,
                Err(e) => {
                    warn!("Stats read failed for player {}: {}", player.player_id, e);
                    events.push(ValueIndexEvent::PlayerDegraded {
                        player_id: player.player_id,
                        input: "stats".to_string(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    player_degraded = true;
                    Vec::new()
                }
            };

            let mentions = match self
                .store
                .sentiment_since(player.player_id, sentiment_since)
                .await
            {
                Ok(mentions) => mentions,
                Err(e) => {
                    warn!("Sentiment read failed for player {}: {}", player.player_id, e);
                    events.push(ValueIndexEvent::PlayerDegraded {
                        player_id: player.player_id,
                        input: "sentiment".to_string(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    player_degraded = true;
                    Vec::new()
                }
            };

            if player_degraded {
                degraded += 1;
            }

            let stat_signal = stat_trend::analyze(&stats);
            let sentiment_signal = sentiment_trend::analyze(&mentions, &self.config.sources);
            let record = self.calculator.build_record(
                player.player_id,
                as_of,
                &stat_signal,
                &sentiment_signal,
            );

            info!(
                "  {}: value {:.1} (stat {:.1}, sentiment {:+.2}, momentum {:+.2}, confidence {:.2})",
                player.full_name,
                record.value_score,
                record.stat_component,
                record.sentiment_component,
                record.momentum_score,
                record.confidence_score
            );

            events.push(ValueIndexEvent::PlayerScored {
                player_id: player.player_id,
                value_score: record.value_score,
                confidence_score: record.confidence_score,
                timestamp: Utc::now(),
            });
            records.push(record);
        }

        let written = match self.store.upsert_value_index(&records).await {
            Ok(written) => written,
            Err(e) => {
                error!("Failed to upsert value index batch: {}", e);
                0
            }
        };

        info!(
            "Value index cycle complete: {} processed, {} written, {} degraded",
            players.len(),
            written,
            degraded
        );

        events.push(ValueIndexEvent::BatchCompleted {
            processed: players.len(),
            written,
            degraded,
            timestamp: Utc::now(),
        });

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_store::{
        MemoryStore, PlayerMeta, Result as StoreResult, SentimentRecord, StatRecord, StoreError,
        ValueIndexRecord,
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    fn meta(player_id: i64, name: &str) -> PlayerMeta {
        PlayerMeta {
            player_id,
            full_name: name.to_string(),
            team_name: "LAL".to_string(),
            position: "SG".to_string(),
        }
    }

    fn game(player_id: i64, day: u32, points: u32) -> StatRecord {
        StatRecord {
            player_id,
            game_date: date(day),
            points,
            rebounds: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_player(meta(1, "Alvin Scorer")).await;
        store.insert_player(meta(2, "Ben Benchwarmer")).await;

        for (day, points) in [(10, 18), (12, 22), (14, 25)] {
            store.insert_stat(game(1, day, points)).await;
        }
        store
            .insert_sentiment(SentimentRecord {
                player_id: 1,
                mention_date: date(14),
                source: "news_espn".to_string(),
                sentiment_score: 0.6,
            })
            .await;

        store
    }

    #[tokio::test]
    async fn cycle_scores_every_player() {
        let store = seeded_store().await;
        let pipeline = ValueIndexPipeline::new(ValueIndexConfig::default(), store.clone());

        let events = pipeline.run_cycle(date(15)).await.unwrap();

        let completed = events
            .iter()
            .find_map(|e| match e {
                ValueIndexEvent::BatchCompleted { processed, written, degraded, .. } => {
                    Some((*processed, *written, *degraded))
                }
                _ => None,
            })
            .expect("batch completion event");
        assert_eq!(completed, (2, 2, 0));

        let scored = store.value_history(1, date(15)).await.unwrap();
        assert_eq!(scored.len(), 1);
        assert!(scored[0].value_score > 50.0);

        // player without any records lands on the neutral prior
        let neutral = store.value_history(2, date(15)).await.unwrap();
        assert_eq!(neutral[0].value_score, 50.0);
        assert_eq!(neutral[0].confidence_score, 0.0);
    }

    #[tokio::test]
    async fn rerunning_the_same_day_is_idempotent() {
        let store = seeded_store().await;
        let pipeline = ValueIndexPipeline::new(ValueIndexConfig::default(), store.clone());

        pipeline.run_cycle(date(15)).await.unwrap();
        let first = store.value_history(1, date(15)).await.unwrap();

        pipeline.run_cycle(date(15)).await.unwrap();
        let second = store.value_history(1, date(15)).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    /// Store whose stat reads fail for one player.
    #[derive(Clone)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_player: i64,
    }

    #[async_trait::async_trait]
    impl ValueStore for FlakyStore {
        async fn list_players(&self) -> StoreResult<Vec<PlayerMeta>> {
            self.inner.list_players().await
        }

        async fn player_meta(&self, player_id: i64) -> StoreResult<Option<PlayerMeta>> {
            self.inner.player_meta(player_id).await
        }

        async fn stats_since(
            &self,
            player_id: i64,
            since: NaiveDate,
        ) -> StoreResult<Vec<StatRecord>> {
            if player_id == self.failing_player {
                return Err(StoreError::config("stats shard offline"));
            }
            self.inner.stats_since(player_id, since).await
        }

        async fn sentiment_since(
            &self,
            player_id: i64,
            since: NaiveDate,
        ) -> StoreResult<Vec<SentimentRecord>> {
            self.inner.sentiment_since(player_id, since).await
        }

        async fn value_history(
            &self,
            player_id: i64,
            since: NaiveDate,
        ) -> StoreResult<Vec<ValueIndexRecord>> {
            self.inner.value_history(player_id, since).await
        }

        async fn value_history_all(&self, since: NaiveDate) -> StoreResult<Vec<ValueIndexRecord>> {
            self.inner.value_history_all(since).await
        }

        async fn upsert_value_index(&self, records: &[ValueIndexRecord]) -> StoreResult<usize> {
            self.inner.upsert_value_index(records).await
        }
    }

    #[tokio::test]
    async fn one_failing_player_does_not_abort_the_batch() {
        let store = FlakyStore { inner: seeded_store().await, failing_player: 1 };
        let pipeline = ValueIndexPipeline::new(ValueIndexConfig::default(), store.clone());

        let events = pipeline.run_cycle(date(15)).await.unwrap();

        let degraded_events: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ValueIndexEvent::PlayerDegraded { player_id: 1, .. }))
            .collect();
        assert_eq!(degraded_events.len(), 1);

        let completed = events
            .iter()
            .find_map(|e| match e {
                ValueIndexEvent::BatchCompleted { processed, written, degraded, .. } => {
                    Some((*processed, *written, *degraded))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(completed, (2, 2, 1));

        // the degraded player still gets a row: sentiment survived, so the
        // score is sentiment-only rather than neutral
        let row = &store.inner.value_history(1, date(15)).await.unwrap()[0];
        assert_eq!(row.stat_component, 0.0);
        assert!(row.sentiment_component > 0.0);
    }
}
