use chrono::Utc;
use forecast_engine::{ForecastConfig, ForecastManager, MoverDetector};
use player_store::PostgresStore;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("{}", "=".repeat(60));
    println!("VALUE FORECAST - DAILY MOVERS REPORT");
    println!("{}", "=".repeat(60));
    info!("Starting forecast engine");

    let config = ForecastConfig::from_env()?;
    let store = PostgresStore::new(&config.database.url, config.database.max_connections).await?;

    let mut manager = ForecastManager::new(config.model.clone(), store.clone());
    let detector = MoverDetector::new(config.movers.clone(), store);

    let today = Utc::now().date_naive();

    let trending = detector.find_trending(&mut manager, 5, today).await?;
    println!("\n📈 TOP {} TRENDING PLAYERS (Rising Fast)", trending.len());
    println!("{}", "-".repeat(60));
    for (i, player) in trending.iter().enumerate() {
        println!(
            "{}. {} ({}) - {}",
            i + 1,
            player.player_name,
            player.team,
            player.position
        );
        println!(
            "   Current: {:.1} | Week Ago: {:.1}",
            player.current_value, player.week_ago_value
        );
        println!(
            "   Trend: {:+.1}% | Predicted (7d): {:.1} | Confidence: {:.0}%",
            player.change_pct,
            player.predicted_value,
            player.prediction_confidence * 100.0
        );
        println!();
    }

    let drops = detector.find_drops(&mut manager, 5, today).await?;
    println!("\n📉 TOP {} VALUE DROPS (Potential Recoveries)", drops.len());
    println!("{}", "-".repeat(60));
    for (i, player) in drops.iter().enumerate() {
        println!(
            "{}. {} ({}) - {}",
            i + 1,
            player.player_name,
            player.team,
            player.position
        );
        println!(
            "   Current: {:.1} | Week Ago: {:.1}",
            player.current_value, player.week_ago_value
        );
        println!(
            "   Drop: {:.1}% | Predicted Recovery: {:+.1}%",
            player.change_pct, player.predicted_recovery
        );
        println!(
            "   Buy Signal: {}",
            if player.buy_signal { "✅ YES" } else { "❌ NO" }
        );
        println!();
    }

    println!("{}", "=".repeat(60));
    debug!("Trending payload: {}", serde_json::to_string(&trending).unwrap_or_default());
    debug!("Drops payload: {}", serde_json::to_string(&drops).unwrap_or_default());
    info!("Movers report complete: {} trending, {} drops", trending.len(), drops.len());

    Ok(())
}
