//! In-memory implementation of the value store
//!
//! Backs tests and local runs that don't want a database. Same contract as
//! the Postgres store, including the replace-not-merge upsert semantics.

use crate::error::Result;
use crate::models::{PlayerMeta, SentimentRecord, StatRecord, ValueIndexRecord};
use crate::store::ValueStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    players: BTreeMap<i64, PlayerMeta>,
    stats: BTreeMap<(i64, NaiveDate), StatRecord>,
    sentiment: Vec<SentimentRecord>,
    values: BTreeMap<(i64, NaiveDate), ValueIndexRecord>,
}

/// BTreeMap-backed store. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_player(&self, meta: PlayerMeta) {
        let mut inner = self.inner.write().await;
        inner.players.insert(meta.player_id, meta);
    }

    pub async fn insert_stat(&self, record: StatRecord) {
        let mut inner = self.inner.write().await;
        inner.stats.insert((record.player_id, record.game_date), record);
    }

    pub async fn insert_sentiment(&self, record: SentimentRecord) {
        let mut inner = self.inner.write().await;
        inner.sentiment.push(record);
    }
}

#[async_trait::async_trait]
impl ValueStore for MemoryStore {
    async fn list_players(&self) -> Result<Vec<PlayerMeta>> {
        let inner = self.inner.read().await;
        Ok(inner.players.values().cloned().collect())
    }

    async fn player_meta(&self, player_id: i64) -> Result<Option<PlayerMeta>> {
        let inner = self.inner.read().await;
        Ok(inner.players.get(&player_id).cloned())
    }

    async fn stats_since(&self, player_id: i64, since: NaiveDate) -> Result<Vec<StatRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .stats
            .range((player_id, since)..=(player_id, NaiveDate::MAX))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn sentiment_since(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<SentimentRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<SentimentRecord> = inner
            .sentiment
            .iter()
            .filter(|r| r.player_id == player_id && r.mention_date >= since)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.mention_date.cmp(&a.mention_date));
        Ok(records)
    }

    async fn value_history(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<ValueIndexRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .values
            .range((player_id, since)..=(player_id, NaiveDate::MAX))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn value_history_all(&self, since: NaiveDate) -> Result<Vec<ValueIndexRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .values
            .values()
            .filter(|r| r.value_date >= since)
            .cloned()
            .collect())
    }

    async fn upsert_value_index(&self, records: &[ValueIndexRecord]) -> Result<usize> {
        let mut inner = self.inner.write().await;
        for record in records {
            inner
                .values
                .insert((record.player_id, record.value_date), record.clone());
        }
        Ok(records.len())
    }
}
