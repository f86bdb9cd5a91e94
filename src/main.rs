// ============================================================================
// CryptoChart - Crypto Market en mode terminal
// ============================================================================
// Choisissez une crypto dans le top 100 CoinGecko et affichez l'évolution de
// son prix sur 24h, 7 jours ou 30 jours
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread : les appels API tournent hors du thread UI
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use cryptochart::api::CoinGeckoClient;
use cryptochart::app::App;
use cryptochart::config::Config;
use cryptochart::ui::{events::EventHandler, render};
use cryptochart::worker::{spawn_worker, WorkerCommand, WorkerHandle};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/cryptochart/logs/cryptochart.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=cryptochart=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptochart.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: cryptochart::api::coingecko)
                .with_thread_ids(true) // Inclut l'ID du thread (UI vs worker)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour cryptochart, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptochart=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env();

    // Logging avant tout le reste ; un échec n'empêche pas l'app de tourner
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api = %config.api_base_url, range = %config.default_range.token(), "CryptoChart starting up");

    // Le worker possède le runtime tokio et le client HTTP
    let client = CoinGeckoClient::new(&config)?;
    let worker = spawn_worker(Arc::new(client))?;

    // La liste des actifs est demandée une seule fois, au démarrage
    worker.send(WorkerCommand::LoadMarkets)?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(config.default_range);
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &worker);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface
//   2. Traiter les événements clavier
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// App n'est touchée que depuis ce thread : pas de Mutex,
/// les résultats du worker arrivent par channel
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    worker: &WorkerHandle,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : on vide le channel sans bloquer
        while let Some(result) = worker.try_recv() {
            app.apply_result(result);
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                if let Some(command) = app.handle_event(&event) {
                    dispatch(app, worker, command);
                }
            }
            Err(e) => debug!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

/// Envoie une commande au worker
///
/// Si le worker ne répond plus, la requête d'historique passe en échec
/// au lieu de rester en chargement
fn dispatch(app: &mut App, worker: &WorkerHandle, command: WorkerCommand) {
    let request_id = match &command {
        WorkerCommand::LoadHistory { request_id, .. } => Some(*request_id),
        WorkerCommand::LoadMarkets => None,
    };

    if let Err(e) = worker.send(command) {
        error!(error = ?e, "Failed to send command to worker");
        if let Some(request_id) = request_id {
            app.on_history_failed(request_id, format!("{:#}", e));
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de l'initialisation du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
