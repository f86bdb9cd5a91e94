// ============================================================================
// Background Worker
// ============================================================================
// Thread séparé qui exécute les appels réseau
//
// CONCEPTS RUST :
// 1. Command pattern avec channels (mpsc)
//    - L'event loop envoie des WorkerCommand
//    - Le worker renvoie des WorkerResult
// 2. Runtime tokio dans un thread standard
//    - main() reste synchrone (TUI)
//    - chaque commande devient une tâche tokio indépendante
//    -> deux fetchs d'historique qui se chevauchent tournent en parallèle
// 3. Arc<dyn MarketDataSource> : la source réseau est injectable
// ============================================================================

use std::cell::Cell;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::api::MarketDataSource;
use crate::models::{Asset, PriceSeries, TimeRange};

/// Commandes envoyées au worker
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerCommand {
    /// Charger la liste des actifs (une fois, au démarrage)
    LoadMarkets,

    /// Charger l'historique d'un actif
    /// - request_id : numéro de séquence, renvoyé tel quel dans le résultat
    LoadHistory {
        request_id: u64,
        asset_id: String,
        range: TimeRange,
    },
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum WorkerResult {
    /// Liste des actifs chargée
    MarketsLoaded(Vec<Asset>),

    /// Échec du chargement de la liste
    MarketsError { error: String },

    /// Historique chargé
    HistoryLoaded { request_id: u64, series: PriceSeries },

    /// Échec du chargement de l'historique
    HistoryError {
        request_id: u64,
        asset_id: String,
        error: String,
    },
}

/// Poignée côté UI : envoie des commandes, relève les résultats
pub struct WorkerHandle {
    command_tx: mpsc::Sender<WorkerCommand>,
    result_rx: mpsc::Receiver<WorkerResult>,
    /// Passe à true à la première déconnexion constatée (log unique)
    disconnected: Cell<bool>,
}

impl WorkerHandle {
    /// Envoie une commande au worker
    pub fn send(&self, command: WorkerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .context("Le worker ne répond plus (channel fermé)")
    }

    /// Relève un résultat sans bloquer
    ///
    /// CONCEPT : Non-blocking receive avec try_recv
    /// - Empty : pas de résultat, c'est normal
    /// - Disconnected : worker mort, on le log une seule fois
    pub fn try_recv(&self) -> Option<WorkerResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                if !self.disconnected.replace(true) {
                    error!("Worker thread disconnected!");
                }
                None
            }
        }
    }

    /// Attend un résultat au plus `timeout`
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<WorkerResult> {
        self.result_rx.recv_timeout(timeout).ok()
    }
}

/// Lance le worker dans un thread dédié
///
/// Le runtime est créé ici (et non dans le thread) pour que
/// l'erreur remonte à l'appelant au lieu de paniquer dans le thread
pub fn spawn_worker(source: Arc<dyn MarketDataSource>) -> Result<WorkerHandle> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio")?;

    let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
    let (result_tx, result_rx) = mpsc::channel::<WorkerResult>();

    std::thread::Builder::new()
        .name("cryptochart-worker".to_string())
        .spawn(move || {
            // Boucle de traitement des commandes
            // - recv() bloque ce thread (pas l'UI)
            // - chaque commande est lancée en tâche, on n'attend pas la fin
            while let Ok(command) = command_rx.recv() {
                info!(?command, "Worker received command");

                let source = Arc::clone(&source);
                let result_tx = result_tx.clone();
                runtime.spawn(async move {
                    let result = execute(&*source, command).await;
                    // L'UI a pu quitter entre-temps : on ignore l'erreur d'envoi
                    let _ = result_tx.send(result);
                });
            }

            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du thread worker")?;

    Ok(WorkerHandle {
        command_tx,
        result_rx,
        disconnected: Cell::new(false),
    })
}

/// Exécute une commande et la convertit en résultat
async fn execute(source: &dyn MarketDataSource, command: WorkerCommand) -> WorkerResult {
    match command {
        WorkerCommand::LoadMarkets => match source.fetch_markets().await {
            Ok(assets) => {
                info!(assets = assets.len(), "Market list loaded");
                WorkerResult::MarketsLoaded(assets)
            }
            Err(e) => {
                error!(error = ?e, "Failed to load market list");
                WorkerResult::MarketsError {
                    error: format!("{:#}", e),
                }
            }
        },

        WorkerCommand::LoadHistory {
            request_id,
            asset_id,
            range,
        } => match source.fetch_history(&asset_id, range).await {
            Ok(series) => {
                debug!(request_id, asset = %asset_id, points = series.len(), "History loaded");
                WorkerResult::HistoryLoaded { request_id, series }
            }
            Err(e) => {
                error!(request_id, asset = %asset_id, error = ?e, "Failed to load history");
                WorkerResult::HistoryError {
                    request_id,
                    asset_id,
                    error: format!("{:#}", e),
                }
            }
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
