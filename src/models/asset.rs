// ============================================================================
// Structure : Asset
// ============================================================================
// Une cryptomonnaie telle que renvoyée par l'endpoint /coins/markets
//
// CONCEPTS RUST :
// 1. Option<f64> : CoinGecko renvoie null pour certains champs (max_supply...)
// 2. #[serde(flatten)] : garde les champs non typés tels quels
// 3. Méthodes de formatage pour le panneau de résumé
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Actif crypto (une ligne du classement par capitalisation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifiant API (ex: "bitcoin")
    pub id: String,

    /// Symbole (ex: "btc")
    #[serde(default)]
    pub symbol: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// URL du logo
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub market_cap: Option<f64>,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    #[serde(default)]
    pub total_volume: Option<f64>,

    #[serde(default)]
    pub high_24h: Option<f64>,

    #[serde(default)]
    pub low_24h: Option<f64>,

    #[serde(default)]
    pub price_change_24h: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub circulating_supply: Option<f64>,

    #[serde(default)]
    pub total_supply: Option<f64>,

    #[serde(default)]
    pub max_supply: Option<f64>,

    /// Plus haut historique
    #[serde(default)]
    pub ath: Option<f64>,

    /// Plus bas historique
    #[serde(default)]
    pub atl: Option<f64>,

    #[serde(default)]
    pub last_updated: Option<String>,

    /// Tous les autres champs, conservés sans interprétation
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Asset {
    /// Crée un actif minimal (utile pour les tests et les placeholders)
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: String::new(),
            name: name.into(),
            image: None,
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_24h: None,
            price_change_percentage_24h: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            ath: None,
            atl: None,
            last_updated: None,
            extra: BTreeMap::new(),
        }
    }

    /// Retourne true si l'actif est en hausse sur 24h
    pub fn is_positive(&self) -> bool {
        self.price_change_percentage_24h
            .map(|c| c >= 0.0)
            .unwrap_or(false)
    }

    /// "Bitcoin (BTC)" ou juste "Bitcoin" si pas de symbole
    pub fn display_name(&self) -> String {
        if self.symbol.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.symbol.to_uppercase())
        }
    }

    /// Variation 24h formatée avec flèche : "▲ +2.34%"
    pub fn change_display(&self) -> Option<String> {
        self.price_change_percentage_24h.map(|c| {
            let arrow = if c >= 0.0 { "▲" } else { "▼" };
            format!("{} {:+.2}%", arrow, c)
        })
    }
}

/// En dessous, un prix à 8 décimales s'afficherait "$0"
const MIN_DECIMAL_PRICE: f64 = 1e-8;

/// Formate un prix : plus de décimales pour les petits prix
///
/// - 64231.5 → "$64,231.50"
/// - 0.00001234 → "$0.00001234"
/// - 0.0000000012 → "$1.20e-9" (8 décimales ne suffisent plus)
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("${}", group_thousands(price, 2))
    } else if price == 0.0 {
        "$0.00".to_string()
    } else if price.abs() < MIN_DECIMAL_PRICE {
        format!("${:.2e}", price)
    } else {
        format!("${:.8}", price)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Formate un grand montant de manière compacte : "$1.27T", "$412.50B", "$3.10M"
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };

    format!("${:.2}{}", scaled, suffix)
}

/// Sépare les milliers par des virgules
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKETS_JSON: &str = r#"[
        {
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 64231.5,
            "market_cap": 1265000000000,
            "market_cap_rank": 1,
            "fully_diluted_valuation": 1348000000000,
            "total_volume": 31000000000,
            "high_24h": 65000,
            "low_24h": 63000,
            "price_change_24h": -512.3,
            "price_change_percentage_24h": -0.79,
            "circulating_supply": 19700000,
            "total_supply": 21000000,
            "max_supply": 21000000,
            "ath": 73738,
            "atl": 67.81,
            "roi": null,
            "last_updated": "2024-05-01T12:00:00.000Z"
        },
        {
            "id": "tether",
            "symbol": "usdt",
            "name": "Tether",
            "current_price": 1.0,
            "market_cap_rank": 3,
            "max_supply": null
        }
    ]"#;

    #[test]
    fn test_deserialize_markets() {
        let assets: Vec<Asset> = serde_json::from_str(MARKETS_JSON).unwrap();
        assert_eq!(assets.len(), 2);

        let btc = &assets[0];
        assert_eq!(btc.id, "bitcoin");
        assert_eq!(btc.name, "Bitcoin");
        assert_eq!(btc.market_cap_rank, Some(1));
        assert_eq!(btc.current_price, Some(64231.5));
        assert!(!btc.is_positive());

        // Les champs non typés sont conservés
        assert!(btc.extra.contains_key("fully_diluted_valuation"));
        assert!(btc.extra.contains_key("roi"));

        let usdt = &assets[1];
        assert_eq!(usdt.max_supply, None);
        assert_eq!(usdt.market_cap, None);
    }

    #[test]
    fn test_display_helpers() {
        let mut asset = Asset::new("bitcoin", "Bitcoin");
        assert_eq!(asset.display_name(), "Bitcoin");
        assert_eq!(asset.change_display(), None);

        asset.symbol = "btc".to_string();
        asset.price_change_percentage_24h = Some(2.346);
        assert_eq!(asset.display_name(), "Bitcoin (BTC)");
        assert_eq!(asset.change_display().unwrap(), "▲ +2.35%");
        assert!(asset.is_positive());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(64231.5), "$64,231.50");
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(0.00001234), "$0.00001234");
        assert_eq!(format_price(0.5), "$0.5");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_format_tiny_price_is_not_zero() {
        assert_eq!(format_price(0.0000000012), "$1.20e-9");
        assert_eq!(format_price(0.000000005), "$5.00e-9");
        assert_eq!(format_price(0.00000001), "$0.00000001");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1_270_000_000_000.0), "$1.27T");
        assert_eq!(format_compact(412_500_000_000.0), "$412.50B");
        assert_eq!(format_compact(3_100_000.0), "$3.10M");
        assert_eq!(format_compact(950.0), "$950.00");
    }
}
