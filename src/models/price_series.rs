// ============================================================================
// Structure : PriceSeries
// ============================================================================
// Série de prix historiques d'un actif sur un range donné
//
// La série est toujours remplacée en entier à chaque fetch :
// jamais de merge ni d'append entre deux réponses.
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TimeRange;

/// Un échantillon (timestamp, prix)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp Unix en millisecondes (format CoinGecko)
    pub timestamp_ms: i64,

    /// Prix dans la devise de cotation
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self { timestamp_ms, price }
    }

    /// Convertit le timestamp en DateTime<Utc>
    ///
    /// None si le timestamp sort de la plage représentable par chrono
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Série de prix pour un actif et un range
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Identifiant de l'actif (ex: "bitcoin")
    pub asset_id: String,

    /// Fenêtre demandée
    pub range: TimeRange,

    /// Points dans l'ordre renvoyé par l'API
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(asset_id: String, range: TimeRange, points: Vec<PricePoint>) -> Self {
        Self {
            asset_id,
            range,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_len() {
        let series = PriceSeries::new(
            "bitcoin".to_string(),
            TimeRange::Week,
            vec![
                PricePoint::new(1_700_000_000_000, 100.0),
                PricePoint::new(1_700_086_400_000, 90.0),
            ],
        );
        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());

        let empty = PriceSeries::new("bitcoin".to_string(), TimeRange::Day, Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_point_datetime() {
        let point = PricePoint::new(1_700_000_000_000, 1.0);
        assert_eq!(point.datetime().unwrap().timestamp(), 1_700_000_000);
    }
}
