// ============================================================================
// Chart Data : projection d'une PriceSeries pour le graphique
// ============================================================================
// Transforme la série (timestamp, prix) en deux vecteurs parallèles :
// - labels : timestamp formaté (HH:MM ou MM-DD selon le range)
// - data : le prix
//
// CONCEPTS RUST :
// 1. Fonctions pures : aucune I/O, testables sans réseau
// 2. Generics avec bounds : build_chart_data_in<Tz: TimeZone>
//    -> Local dans l'application, Utc dans les tests (résultats stables)
// 3. Serialize avec rename_all : JSON au format chart.js
// ============================================================================

use std::fmt;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::models::{PriceSeries, TimeRange};

/// Label de la série (devise de cotation)
pub const DATASET_LABEL: &str = "USD";

/// Couleur de la courbe
pub const BORDER_COLOR: RgbaColor = RgbaColor::rgb(255, 99, 132);

/// Couleur de remplissage (même teinte, semi-transparente)
pub const BACKGROUND_COLOR: RgbaColor = RgbaColor::rgba(255, 99, 132, 0.5);

/// Label utilisé quand un timestamp est hors plage
const INVALID_LABEL: &str = "??";

/// Couleur RGBA sérialisée en "rgb(...)" / "rgba(...)"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl RgbaColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
        }
    }
}

impl Serialize for RgbaColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Une série de valeurs avec son style
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: RgbaColor,
    pub background_color: RgbaColor,
}

/// Données prêtes pour le graphique : labels + datasets
///
/// Invariant : chaque dataset a autant de valeurs que `labels`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Nombre de points
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Valeurs de la première série (la seule pour l'instant)
    pub fn values(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    /// Prix minimum et maximum en un seul passage (None si vide)
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let values = self.values();
        if values.is_empty() {
            return None;
        }

        Some(values.iter().fold((f64::MAX, f64::MIN), |(min, max), &v| {
            (min.min(v), max.max(v))
        }))
    }
}

/// Graphique complet : titre + données, pour un couple (actif, range)
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub asset_id: String,
    pub range: TimeRange,
    pub title: String,
    pub data: ChartData,
}

impl PriceChart {
    /// Construit le graphique depuis une série, labels en heure locale
    pub fn from_series(series: &PriceSeries) -> Self {
        Self::from_series_in(series, &Local)
    }

    /// Construit le graphique depuis une série, labels dans le fuseau `tz`
    pub fn from_series_in<Tz>(series: &PriceSeries, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            asset_id: series.asset_id.clone(),
            range: series.range,
            title: series.range.chart_title(),
            data: build_chart_data_in(series, tz),
        }
    }
}

/// Projette une série en ChartData, labels dans le fuseau `tz`
///
/// CONCEPT RUST : Iterator chaining
/// - un seul passage par vecteur, l'ordre de la série est conservé
/// - un timestamp invalide donne un label "??" plutôt que de décaler les
///   labels par rapport aux valeurs
pub fn build_chart_data_in<Tz>(series: &PriceSeries, tz: &Tz) -> ChartData
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let format = series.range.label_format();

    let labels = series
        .points
        .iter()
        .map(|point| {
            point
                .datetime()
                .map(|dt| dt.with_timezone(tz).format(format).to_string())
                .unwrap_or_else(|| INVALID_LABEL.to_string())
        })
        .collect();

    let data = series.points.iter().map(|point| point.price).collect();

    ChartData {
        labels,
        datasets: vec![ChartDataset {
            label: DATASET_LABEL.to_string(),
            data,
            border_color: BORDER_COLOR,
            background_color: BACKGROUND_COLOR,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::Utc;

    fn series(range: TimeRange, points: &[(i64, f64)]) -> PriceSeries {
        PriceSeries::new(
            "bitcoin".to_string(),
            range,
            points.iter().map(|&(t, p)| PricePoint::new(t, p)).collect(),
        )
    }

    #[test]
    fn test_daily_labels_and_values() {
        let s = series(
            TimeRange::Week,
            &[(1_700_000_000_000, 100.0), (1_700_086_400_000, 110.0)],
        );

        let data = build_chart_data_in(&s, &Utc);
        assert_eq!(data.labels, vec!["11-14", "11-15"]);
        assert_eq!(data.datasets.len(), 1);
        assert_eq!(data.datasets[0].data, vec![100.0, 110.0]);
        assert_eq!(data.datasets[0].label, "USD");
    }

    #[test]
    fn test_hourly_labels() {
        // 2023-11-14 22:13:20 UTC puis +1h
        let s = series(
            TimeRange::Day,
            &[(1_700_000_000_000, 1.0), (1_700_003_600_000, 2.0)],
        );

        let data = build_chart_data_in(&s, &Utc);
        assert_eq!(data.labels, vec!["22:13", "23:13"]);
    }

    #[test]
    fn test_labels_match_values_in_order() {
        let points: Vec<(i64, f64)> = (0..48)
            .map(|i| (1_700_000_000_000 + i * 3_600_000, 1000.0 - i as f64))
            .collect();
        let s = series(TimeRange::Day, &points);

        let data = build_chart_data_in(&s, &Utc);
        assert_eq!(data.len(), 48);
        assert_eq!(data.values().len(), 48);
        assert_eq!(data.values()[0], 1000.0);
        assert_eq!(data.values()[47], 953.0);
        assert_eq!(data.value_bounds(), Some((953.0, 1000.0)));
    }

    #[test]
    fn test_invalid_timestamp_keeps_alignment() {
        let s = series(TimeRange::Week, &[(i64::MAX, 5.0), (1_700_000_000_000, 6.0)]);

        let data = build_chart_data_in(&s, &Utc);
        assert_eq!(data.labels, vec!["??", "11-14"]);
        assert_eq!(data.values(), &[5.0, 6.0]);
    }

    #[test]
    fn test_value_bounds() {
        let s = series(
            TimeRange::Week,
            &[(1_700_000_000_000, 100.0), (1_700_086_400_000, 90.0), (1_700_172_800_000, 110.0)],
        );
        assert_eq!(build_chart_data_in(&s, &Utc).value_bounds(), Some((90.0, 110.0)));

        let empty = series(TimeRange::Day, &[]);
        assert_eq!(build_chart_data_in(&empty, &Utc).value_bounds(), None);
    }

    #[test]
    fn test_price_chart_title() {
        let s = series(TimeRange::Day, &[(1_700_000_000_000, 1.0)]);
        let chart = PriceChart::from_series_in(&s, &Utc);
        assert_eq!(chart.title, "Price Over The Last 24 Hours.");
        assert_eq!(chart.asset_id, "bitcoin");
    }

    #[test]
    fn test_chart_json_shape() {
        let s = series(TimeRange::Week, &[(1_700_000_000_000, 100.0)]);
        let json = serde_json::to_value(build_chart_data_in(&s, &Utc)).unwrap();

        assert_eq!(json["labels"][0], "11-14");
        assert_eq!(json["datasets"][0]["data"][0], 100.0);
        assert_eq!(json["datasets"][0]["borderColor"], "rgb(255, 99, 132)");
        assert_eq!(json["datasets"][0]["backgroundColor"], "rgba(255, 99, 132, 0.5)");
    }
}
