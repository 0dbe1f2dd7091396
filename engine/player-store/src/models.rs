use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Roster metadata for a tracked player. Owned by the roster collaborator;
/// the value engines only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub player_id: i64,
    pub full_name: String,
    pub team_name: String,
    pub position: String,
}

/// One boxscore row per player per game date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRecord {
    pub player_id: i64,
    pub game_date: NaiveDate,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
}

/// One sentiment mention for a player. Many per player per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub player_id: i64,
    pub mention_date: NaiveDate,
    /// Free-form origin tag, e.g. "news_espn" or "reddit_nba"
    pub source: String,
    /// Labeled sentiment in [-1, 1]
    pub sentiment_score: f64,
}

/// Daily composite value record, unique on (player_id, value_date).
/// Written with a keyed upsert so same-day re-runs overwrite in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueIndexRecord {
    pub player_id: i64,
    pub value_date: NaiveDate,
    /// Normalized composite score in [0, 100]
    pub value_score: f64,
    /// Recency-weighted fantasy production feeding the score
    pub stat_component: f64,
    /// Source-weighted average sentiment feeding the score
    pub sentiment_component: f64,
    /// Signed trend-alignment measure
    pub momentum_score: f64,
    /// How much real data backs the score, in [0, 1]
    pub confidence_score: f64,
}
