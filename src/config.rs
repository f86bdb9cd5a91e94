// ============================================================================
// Configuration
// ============================================================================
// Paramètres d'exécution de l'application : URL de l'API, devise de cotation,
// taille de la liste de marché, intervalle par défaut et dossier des logs.
//
// Les valeurs par défaut suffisent dans 99% des cas ; trois variables
// d'environnement permettent de les surcharger :
// - CRYPTOCHART_API_URL : URL de base de l'API (ex: un proxy CoinGecko)
// - CRYPTOCHART_LOG_DIR : dossier où écrire les logs
// - CRYPTOCHART_RANGE : range au démarrage ("1", "7" ou "30")
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::models::TimeRange;

/// URL publique de l'API CoinGecko v3
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Variable d'environnement pour surcharger l'URL de l'API
pub const API_URL_ENV: &str = "CRYPTOCHART_API_URL";

/// Variable d'environnement pour surcharger le dossier des logs
pub const LOG_DIR_ENV: &str = "CRYPTOCHART_LOG_DIR";

/// Variable d'environnement pour choisir le range au démarrage
pub const RANGE_ENV: &str = "CRYPTOCHART_RANGE";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL de base de l'API (sans slash final)
    pub api_base_url: String,

    /// Devise de cotation (ex: "usd")
    pub vs_currency: String,

    /// Nombre d'actifs demandés à l'endpoint markets (max 250 chez CoinGecko)
    pub per_page: u32,

    /// Intervalle sélectionné au démarrage
    pub default_range: TimeRange,

    /// Timeout de chaque requête HTTP
    pub request_timeout: Duration,

    /// Dossier des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Construit la configuration depuis l'environnement du processus
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lookup
    ///
    /// CONCEPT RUST : Injection via closure
    /// - from_env() passe std::env::var
    /// - les tests passent une closure sur des valeurs fixes
    ///   (pas de set_var global qui ferait interférer les tests entre eux)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }

        // Token inconnu : on garde le range par défaut
        if let Some(range) = lookup(RANGE_ENV).and_then(|v| TimeRange::from_token(&v)) {
            config.default_range = range;
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            vs_currency: "usd".to_string(),
            per_page: 100,
            default_range: TimeRange::default(),
            request_timeout: Duration::from_secs(30),
            log_dir: default_log_dir(),
        }
    }
}

/// Dossier de logs par défaut
///
/// - Linux/WSL : ~/.local/share/cryptochart/logs
/// - macOS : ~/Library/Application Support/cryptochart/logs
/// - Windows : C:\Users\<user>\AppData\Local\cryptochart\logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("cryptochart").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}
