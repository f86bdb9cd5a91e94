// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère la liste des cryptos et l'historique des prix depuis CoinGecko
//
// Deux endpoints en lecture seule, sans authentification :
// - /coins/markets : top N par capitalisation, prix en USD
// - /coins/{id}/market_chart : série [timestamp_ms, prix] sur N jours
//
// CONCEPTS RUST :
// 1. async/await : les appels réseau ne bloquent pas le thread
// 2. anyhow::Context : chaque erreur explique où elle s'est produite
// 3. Serde : désérialisation JSON automatique
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::MarketDataSource;
use crate::config::Config;
use crate::models::{Asset, PricePoint, PriceSeries, TimeRange};

/// User-Agent envoyé avec chaque requête
const USER_AGENT: &str = concat!("cryptochart/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Structures pour parser la réponse JSON de market_chart
// ============================================================================
// CoinGecko renvoie trois séries parallèles ; seule "prices" nous intéresse.
// Chaque échantillon est un tableau [timestamp_ms, valeur].
// ============================================================================

/// Réponse de /coins/{id}/market_chart
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<Vec<Option<f64>>>,
}

/// Client HTTP CoinGecko
///
/// Le reqwest::Client est créé une seule fois : il garde un pool de
/// connexions, le cloner est bon marché (Arc interne)
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    vs_currency: String,
    per_page: u32,
}

impl CoinGeckoClient {
    /// Crée un client à partir de la configuration
    pub fn new(config: &Config) -> Result<Self> {
        debug!(base_url = %config.api_base_url, "Creating HTTP client");
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            vs_currency: config.vs_currency.clone(),
            per_page: config.per_page,
        })
    }

    /// GET + vérification du statut + parsing JSON
    ///
    /// CONCEPT RUST : Generics avec DeserializeOwned
    /// - T est choisi par l'appelant (Vec<Asset>, MarketChartResponse...)
    /// - for<'de> Deserialize<'de> : T ne garde aucune référence sur le body
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(url = %url, "Sending HTTP request to CoinGecko");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinGecko")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            anyhow::bail!("CoinGecko a retourné une erreur : HTTP {}", status);
        }

        response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinGecko")
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    /// Récupère le top des actifs par capitalisation
    #[instrument(skip(self))]
    async fn fetch_markets(&self) -> Result<Vec<Asset>> {
        let url = build_markets_url(&self.base_url, &self.vs_currency, self.per_page);
        let assets: Vec<Asset> = self.get_json(&url).await?;

        info!(assets = assets.len(), "Successfully fetched market list");
        Ok(assets)
    }

    /// Récupère l'historique des prix d'un actif
    #[instrument(skip(self, range), fields(range = %range.token()))]
    async fn fetch_history(&self, asset_id: &str, range: TimeRange) -> Result<PriceSeries> {
        let url = build_history_url(&self.base_url, asset_id, &self.vs_currency, range);
        let response: MarketChartResponse = self.get_json(&url).await?;

        let series = parse_market_chart(response, asset_id, range);
        info!(points = series.len(), "Successfully fetched price history");
        Ok(series)
    }
}

/// Construit l'URL de l'endpoint markets
fn build_markets_url(base_url: &str, vs_currency: &str, per_page: u32) -> String {
    format!(
        "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
        base_url, vs_currency, per_page
    )
}

/// Construit l'URL de l'endpoint market_chart
///
/// La granularité suit le range : hourly sur 1 jour, daily au-delà
fn build_history_url(base_url: &str, asset_id: &str, vs_currency: &str, range: TimeRange) -> String {
    format!(
        "{}/coins/{}/market_chart?vs_currency={}&days={}&interval={}",
        base_url,
        asset_id,
        vs_currency,
        range.days(),
        range.granularity().as_query_value()
    )
}

/// Convertit la réponse market_chart en PriceSeries
///
/// Les échantillons incomplets (null, tableau trop court) sont ignorés
/// et comptés dans un warning
fn parse_market_chart(response: MarketChartResponse, asset_id: &str, range: TimeRange) -> PriceSeries {
    let total = response.prices.len();
    let mut skipped_count = 0;

    let points: Vec<PricePoint> = response
        .prices
        .into_iter()
        .filter_map(|sample| match (sample.first(), sample.get(1)) {
            (Some(Some(timestamp)), Some(Some(price))) => {
                Some(PricePoint::new(*timestamp as i64, *price))
            }
            _ => {
                skipped_count += 1;
                None
            }
        })
        .collect();

    if skipped_count > 0 {
        warn!(skipped = skipped_count, total, "Skipped malformed price samples");
    }

    if points.is_empty() {
        warn!(asset = %asset_id, "CoinGecko returned an empty price series");
    }

    PriceSeries::new(asset_id.to_string(), range, points)
}

// ============================================================================
// Tests unitaires
// ============================================================================
