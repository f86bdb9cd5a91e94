// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod asset;        // Actif renvoyé par l'endpoint markets
pub mod chart_data;   // Projection série -> graphique
pub mod price_series; // Série historique (timestamp, prix)
pub mod range;        // Fenêtre de temps (1, 7, 30 jours)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use cryptochart::models::range::TimeRange;
// On peut faire : use cryptochart::models::TimeRange;
pub use asset::Asset;
pub use chart_data::{build_chart_data_in, ChartData, ChartDataset, PriceChart};
pub use price_series::{PricePoint, PriceSeries};
pub use range::{Granularity, TimeRange};
