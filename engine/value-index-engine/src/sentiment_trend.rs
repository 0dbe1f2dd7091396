//! Sentiment trend analyzer
//!
//! Converts a player's recent mentions into a source-weighted sentiment
//! average, a recent-vs-older trend and a volume-based confidence proxy.

use crate::config::SourceWeight;
use crate::signal::TrendOutcome;
use player_store::SentimentRecord;

/// Mentions needed before the recent/older split says anything
const MIN_RECORDS_FOR_TREND: usize = 5;

/// Mention count at which volume confidence saturates
const VOLUME_SATURATION: f64 = 20.0;

/// Metrics derived from a player's recent mentions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentTrend {
    /// Mean of source-weighted sentiment scores
    pub avg_sentiment: f64,
    /// Recent-half mean minus older-half mean
    pub trend: f64,
    /// min(mentions / 20, 1); saturating confidence proxy
    pub volume: f64,
}

/// Resolve the weight for a source tag against the ordered table.
/// First pattern contained in the tag wins; unmatched tags weigh 1.0.
pub fn source_weight(sources: &[SourceWeight], tag: &str) -> f64 {
    sources
        .iter()
        .find(|entry| tag.contains(&entry.pattern))
        .map(|entry| entry.weight)
        .unwrap_or(1.0)
}

/// Analyze a player's mentions, ordered most recent first.
pub fn analyze(
    records: &[SentimentRecord],
    sources: &[SourceWeight],
) -> TrendOutcome<SentimentTrend> {
    if records.is_empty() {
        return TrendOutcome::NoData;
    }

    let weighted: Vec<f64> = records
        .iter()
        .map(|r| r.sentiment_score * source_weight(sources, &r.source))
        .collect();

    let trend = if weighted.len() >= MIN_RECORDS_FOR_TREND {
        let half = weighted.len() / 2;
        mean(&weighted[..half]) - mean(&weighted[half..])
    } else {
        0.0
    };

    TrendOutcome::Computed(SentimentTrend {
        avg_sentiment: mean(&weighted),
        trend,
        volume: (weighted.len() as f64 / VOLUME_SATURATION).min(1.0),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueIndexConfig;
    use chrono::NaiveDate;

    fn mention(day: u32, source: &str, score: f64) -> SentimentRecord {
        SentimentRecord {
            player_id: 1,
            mention_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            source: source.to_string(),
            sentiment_score: score,
        }
    }

    fn default_sources() -> Vec<SourceWeight> {
        ValueIndexConfig::default().sources
    }

    #[test]
    fn source_weight_matches_first_pattern() {
        let sources = default_sources();
        // longer pattern listed first wins over its substring
        assert_eq!(source_weight(&sources, "reddit_nbadiscussion"), 1.3);
        assert_eq!(source_weight(&sources, "reddit_nba"), 1.2);
        assert_eq!(source_weight(&sources, "news_espn_insider"), 1.5);
        assert_eq!(source_weight(&sources, "hoops_forum_daily"), 0.9);
        assert_eq!(source_weight(&sources, "unknown_blog"), 1.0);
    }

    #[test]
    fn average_uses_source_weights() {
        let sources = default_sources();
        let records = vec![
            mention(5, "news_espn", 0.4),    // 0.6
            mention(4, "unknown_blog", 0.2), // 0.2
        ];
        let trend = analyze(&records, &sources).metrics();
        assert!((trend.avg_sentiment - 0.4).abs() < 1e-12);
    }

    #[test]
    fn trend_splits_recent_half_against_older_half() {
        let sources = vec![];
        // most recent first: recent half = first 2, older half = last 3
        let records = vec![
            mention(10, "x", 0.5),
            mention(9, "x", 0.4),
            mention(8, "x", 0.1),
            mention(7, "x", 0.0),
            mention(6, "x", -0.1),
        ];
        let trend = analyze(&records, &sources).metrics();
        assert!((trend.trend - 0.45).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_five_records_has_zero_trend() {
        let sources = vec![];
        let records = vec![
            mention(10, "x", 0.9),
            mention(9, "x", -0.9),
            mention(8, "x", 0.9),
            mention(7, "x", -0.9),
        ];
        let trend = analyze(&records, &sources).metrics();
        assert_eq!(trend.trend, 0.0);
    }

    #[test]
    fn volume_saturates_at_twenty_mentions() {
        let sources = vec![];
        let few: Vec<SentimentRecord> = (0..4).map(|i| mention(10 - i, "x", 0.1)).collect();
        assert!((analyze(&few, &sources).metrics().volume - 0.2).abs() < 1e-12);

        let many: Vec<SentimentRecord> = (0..25).map(|_| mention(10, "x", 0.1)).collect();
        assert_eq!(analyze(&many, &sources).metrics().volume, 1.0);
    }

    #[test]
    fn no_mentions_is_no_data() {
        let outcome = analyze(&[], &default_sources());
        assert!(outcome.is_no_data());
        let metrics = outcome.metrics();
        assert_eq!(metrics.avg_sentiment, 0.0);
        assert_eq!(metrics.trend, 0.0);
        assert_eq!(metrics.volume, 0.0);
    }
}
