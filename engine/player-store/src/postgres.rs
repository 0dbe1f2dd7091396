//! PostgreSQL implementation of the value store

use crate::error::Result;
use crate::models::{PlayerMeta, SentimentRecord, StatRecord, ValueIndexRecord};
use crate::store::ValueStore;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

/// PostgreSQL storage adapter
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }
}

fn row_to_value_record(row: &PgRow) -> ValueIndexRecord {
    ValueIndexRecord {
        player_id: row.get("player_id"),
        value_date: row.get("value_date"),
        value_score: row.get("value_score"),
        stat_component: row.get("stat_component"),
        sentiment_component: row.get("sentiment_component"),
        momentum_score: row.get("momentum_score"),
        confidence_score: row.get("confidence_score"),
    }
}

fn row_to_player_meta(row: &PgRow) -> PlayerMeta {
    PlayerMeta {
        player_id: row.get("player_id"),
        full_name: row.get("full_name"),
        team_name: row.get("team_name"),
        position: row.get("position"),
    }
}

#[async_trait::async_trait]
impl ValueStore for PostgresStore {
    async fn list_players(&self) -> Result<Vec<PlayerMeta>> {
        let rows = sqlx::query(
            "SELECT player_id, full_name, team_name, position FROM players ORDER BY player_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_player_meta).collect())
    }

    async fn player_meta(&self, player_id: i64) -> Result<Option<PlayerMeta>> {
        let row = sqlx::query(
            "SELECT player_id, full_name, team_name, position FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_player_meta))
    }

    async fn stats_since(&self, player_id: i64, since: NaiveDate) -> Result<Vec<StatRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, game_date, points, rebounds, assists, steals, blocks, turnovers
            FROM daily_player_stats
            WHERE player_id = $1 AND game_date >= $2
            ORDER BY game_date
            "#,
        )
        .bind(player_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| StatRecord {
                player_id: r.get("player_id"),
                game_date: r.get("game_date"),
                points: r.get::<i32, _>("points") as u32,
                rebounds: r.get::<i32, _>("rebounds") as u32,
                assists: r.get::<i32, _>("assists") as u32,
                steals: r.get::<i32, _>("steals") as u32,
                blocks: r.get::<i32, _>("blocks") as u32,
                turnovers: r.get::<i32, _>("turnovers") as u32,
            })
            .collect())
    }

    async fn sentiment_since(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<SentimentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, mention_date, source, sentiment_score
            FROM daily_player_sentiment
            WHERE player_id = $1 AND mention_date >= $2
            ORDER BY mention_date DESC
            "#,
        )
        .bind(player_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| SentimentRecord {
                player_id: r.get("player_id"),
                mention_date: r.get("mention_date"),
                source: r.get("source"),
                sentiment_score: r.get("sentiment_score"),
            })
            .collect())
    }

    async fn value_history(
        &self,
        player_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<ValueIndexRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, value_date, value_score, stat_component,
                   sentiment_component, momentum_score, confidence_score
            FROM player_value_index
            WHERE player_id = $1 AND value_date >= $2
            ORDER BY value_date
            "#,
        )
        .bind(player_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_value_record).collect())
    }

    async fn value_history_all(&self, since: NaiveDate) -> Result<Vec<ValueIndexRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, value_date, value_score, stat_component,
                   sentiment_component, momentum_score, confidence_score
            FROM player_value_index
            WHERE value_date >= $1
            ORDER BY player_id, value_date
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_value_record).collect())
    }

    async fn upsert_value_index(&self, records: &[ValueIndexRecord]) -> Result<usize> {
        let mut written = 0;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO player_value_index
                    (player_id, value_date, value_score, stat_component,
                     sentiment_component, momentum_score, confidence_score)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (player_id, value_date) DO UPDATE SET
                    value_score = EXCLUDED.value_score,
                    stat_component = EXCLUDED.stat_component,
                    sentiment_component = EXCLUDED.sentiment_component,
                    momentum_score = EXCLUDED.momentum_score,
                    confidence_score = EXCLUDED.confidence_score
                "#,
            )
            .bind(record.player_id)
            .bind(record.value_date)
            .bind(record.value_score)
            .bind(record.stat_component)
            .bind(record.sentiment_component)
            .bind(record.momentum_score)
            .bind(record.confidence_score)
            .execute(&self.pool)
            .await?;

            written += 1;
        }

        Ok(written)
    }
}
