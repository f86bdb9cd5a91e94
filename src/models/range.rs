// ============================================================================
// Enum : TimeRange
// ============================================================================
// Fenêtre de temps affichée sur le graphique (le "range token")
//
// Un seul choix pilote trois choses :
// 1. Le nombre de jours demandé à l'API (days=1, 7, 30)
// 2. La granularité des points (hourly pour 1 jour, daily sinon)
// 3. Le format des labels de l'axe X (HH:MM pour 1 jour, MM-DD sinon)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Granularité des points renvoyés par l'endpoint market_chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// Un point par heure
    Hourly,
    /// Un point par jour
    Daily,
}

impl Granularity {
    /// Valeur du paramètre `interval` de CoinGecko
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
        }
    }
}

/// Fenêtre de temps du graphique
///
/// CONCEPT RUST : Enum fermé au lieu d'une String
/// - Le "token" ("1", "7", "30") n'existe qu'aux frontières (API, clavier)
/// - À l'intérieur, impossible de représenter un range invalide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    /// Dernières 24 heures
    Day,
    /// 7 derniers jours
    Week,
    /// 30 derniers jours
    Month,
}

impl TimeRange {
    /// Tous les ranges, dans l'ordre d'affichage
    pub const ALL: [TimeRange; 3] = [TimeRange::Day, TimeRange::Week, TimeRange::Month];

    /// Nombre de jours couverts
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }

    /// Token texte du range ("1", "7", "30")
    pub fn token(&self) -> &'static str {
        match self {
            TimeRange::Day => "1",
            TimeRange::Week => "7",
            TimeRange::Month => "30",
        }
    }

    /// Parse un token ; None si le token n'est pas reconnu
    pub fn from_token(token: &str) -> Option<TimeRange> {
        match token.trim() {
            "1" => Some(TimeRange::Day),
            "7" => Some(TimeRange::Week),
            "30" => Some(TimeRange::Month),
            _ => None,
        }
    }

    /// Label court pour le sélecteur
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        }
    }

    /// Granularité demandée à l'API : horaire sur 1 jour, journalière sinon
    pub fn granularity(&self) -> Granularity {
        match self {
            TimeRange::Day => Granularity::Hourly,
            TimeRange::Week | TimeRange::Month => Granularity::Daily,
        }
    }

    /// Format chrono des labels de l'axe X
    pub fn label_format(&self) -> &'static str {
        match self {
            TimeRange::Day => "%H:%M",
            TimeRange::Week | TimeRange::Month => "%m-%d",
        }
    }

    /// Titre du graphique
    pub fn chart_title(&self) -> String {
        match self {
            TimeRange::Day => "Price Over The Last 24 Hours.".to_string(),
            other => format!("Price Over The Last {} Days.", other.days()),
        }
    }

    /// Range suivant (cycle)
    pub fn next(&self) -> TimeRange {
        match self {
            TimeRange::Day => TimeRange::Week,
            TimeRange::Week => TimeRange::Month,
            TimeRange::Month => TimeRange::Day, // Boucle
        }
    }

    /// Range précédent (cycle)
    pub fn previous(&self) -> TimeRange {
        match self {
            TimeRange::Day => TimeRange::Month, // Boucle
            TimeRange::Week => TimeRange::Day,
            TimeRange::Month => TimeRange::Week,
        }
    }
}

impl Default for TimeRange {
    /// 30 jours par défaut
    fn default() -> Self {
        TimeRange::Month
    }
}
