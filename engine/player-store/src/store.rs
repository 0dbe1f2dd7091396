//! Storage contract consumed by the value index and forecast engines

use crate::error::Result;
use crate::models::{PlayerMeta, SentimentRecord, StatRecord, ValueIndexRecord};
use chrono::NaiveDate;

/// Abstract time-series store for player stats, sentiment and value records.
///
/// Reads return rows in the order the consuming analyzer expects: stats and
/// value history ascending by date, sentiment most recent first.
#[async_trait::async_trait]
pub trait ValueStore: Send + Sync {
    /// List all tracked players
    async fn list_players(&self) -> Result<Vec<PlayerMeta>>;

    /// Read roster metadata for one player
    async fn player_meta(&self, player_id: i64) -> Result<Option<PlayerMeta>>;

    /// Read a player's stat records with game_date >= since, ascending by date
    async fn stats_since(&self, player_id: i64, since: NaiveDate) -> Result<Vec<StatRecord>>;

    /// Read a player's sentiment records with mention_date >= since,
    /// most recent first
    async fn sentiment_since(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<SentimentRecord>>;

    /// Read a player's value history with value_date >= since, ascending by date
    async fn value_history(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<ValueIndexRecord>>;

    /// Read value history across all players with value_date >= since
    async fn value_history_all(&self, since: NaiveDate) -> Result<Vec<ValueIndexRecord>>;

    /// Upsert value records keyed on (player_id, value_date). A conflicting
    /// row is fully replaced, never merged. Returns the number written.
    async fn upsert_value_index(&self, records: &[ValueIndexRecord]) -> Result<usize>;
}
