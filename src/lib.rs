// ============================================================================
// CryptoChart - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client API CoinGecko
pub mod app;       // État de l'application
pub mod config;    // Configuration
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur
pub mod worker;    // Appels réseau en arrière-plan
