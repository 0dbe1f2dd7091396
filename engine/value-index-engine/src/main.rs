use chrono::Utc;
use player_store::PostgresStore;
use tracing::{info, warn};
use value_index_engine::{ValueIndexConfig, ValueIndexEvent, ValueIndexPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("🏀 Value Index Engine starting...");
    info!("Starting value index engine");

    let config = ValueIndexConfig::from_env()?;
    info!("Loaded configuration: {:?}", config.window);

    let store = PostgresStore::new(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;

    let today = Utc::now().date_naive();
    let pipeline = ValueIndexPipeline::new(config, store);

    let events = pipeline.run_cycle(today).await?;

    for event in &events {
        match event {
            ValueIndexEvent::BatchCompleted { processed, written, degraded, .. } => {
                println!(
                    "✅ Cycle complete for {}: {} players processed, {} records written, {} degraded",
                    today, processed, written, degraded
                );
            }
            ValueIndexEvent::PlayerDegraded { .. } => {
                warn!("Degraded: {}", serde_json::to_string(event).unwrap_or_default());
            }
            ValueIndexEvent::PlayerScored { .. } => {}
        }
    }

    Ok(())
}
