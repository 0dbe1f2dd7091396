//! Forecast Engine
//!
//! Fits a lightweight per-player regression over the value index history to
//! project near-term value, and scans the recent history across all players
//! for week-over-week movers with recovery signals.

pub mod config;
pub mod manager;
pub mod models;
pub mod momentum;
pub mod movers;
pub mod regression;

pub use config::ForecastConfig;
pub use manager::ForecastManager;
pub use models::{ForecastPoint, TrendingPlayer, ValueDrop};
pub use momentum::{price_momentum, PriceMomentum, TrendDirection};
pub use movers::MoverDetector;
pub use regression::{fit_ols, OlsModel};
