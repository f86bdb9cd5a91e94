// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients API qui récupèrent les données de marché
//
// CONCEPT RUST : Trait comme point d'injection
// - Le reste de l'application ne connaît que MarketDataSource
// - CoinGeckoClient est l'implémentation réseau
// - Les tests injectent une source factice (pas de réseau)
// ============================================================================

pub mod coingecko; // Client API CoinGecko

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Asset, PriceSeries, TimeRange};

// Re-export du client principal
pub use coingecko::CoinGeckoClient;

/// Source de données de marché (lecture seule)
///
/// CONCEPT RUST : #[async_trait]
/// - Les méthodes async d'un trait ne sont pas object-safe nativement
/// - async_trait les transforme en Pin<Box<dyn Future + Send>>
/// - On peut alors stocker un Arc<dyn MarketDataSource> dans le worker
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Liste des actifs les mieux classés par capitalisation
    async fn fetch_markets(&self) -> Result<Vec<Asset>>;

    /// Historique des prix d'un actif sur un range
    async fn fetch_history(&self, asset_id: &str, range: TimeRange) -> Result<PriceSeries>;
}
