// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Fonctions pures : chaque action retourne la requête à envoyer
//    (Option<HistoryRequest>) au lieu de faire l'appel réseau elle-même
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Seul le thread UI écrit dans App : pas de Mutex
// ============================================================================

use tracing::{debug, info, warn};

use crate::models::{Asset, PriceChart, PriceSeries, TimeRange};
use crate::ui::events::{
    is_down_event, is_enter_event, is_next_range_event, is_page_down_event, is_page_up_event,
    is_previous_range_event, is_quit_event, is_up_event, range_from_event, Event,
};
use crate::worker::{WorkerCommand, WorkerResult};

/// Texte de l'option placeholder (index 0 du sélecteur)
pub const PLACEHOLDER_LABEL: &str = "Choose a currency";

/// Nombre d'options sautées par PageUp / PageDown
pub const PAGE_SIZE: usize = 10;

/// État du chargement de la liste des actifs
#[derive(Debug, Clone, PartialEq)]
pub enum MarketListState {
    /// Requête en cours
    Loading,
    /// Liste disponible (éventuellement vide)
    Loaded,
    /// Échec : la liste reste vide
    Failed(String),
}

/// État du graphique
///
/// CONCEPT RUST : Enum pour state machines
/// - Idle → Loading → Ready | Failed, ré-entré à chaque changement
/// - Le request_id de Loading dit quelle réponse on attend
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    /// Aucun actif sélectionné
    Idle,
    /// Historique demandé, réponse attendue
    Loading { request_id: u64 },
    /// Graphique prêt pour la sélection courante
    Ready(PriceChart),
    /// Échec du dernier fetch
    Failed { message: String },
}

/// Sélection courante de l'utilisateur
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Actif choisi (None = placeholder)
    pub asset: Option<Asset>,
    /// Fenêtre de temps choisie
    pub range: TimeRange,
}

/// Requête d'historique à envoyer au worker
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub request_id: u64,
    pub asset_id: String,
    pub range: TimeRange,
}

impl HistoryRequest {
    /// Convertit la requête en commande worker
    pub fn into_command(self) -> WorkerCommand {
        WorkerCommand::LoadHistory {
            request_id: self.request_id,
            asset_id: self.asset_id,
            range: self.range,
        }
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    /// Actifs classés par capitalisation (vide tant que non chargés)
    pub assets: Vec<Asset>,

    /// État du chargement de la liste
    pub market_state: MarketListState,

    /// Option surlignée dans le sélecteur (0 = placeholder)
    pub highlighted: usize,

    /// Sélection validée
    pub selection: Selection,

    /// État du graphique
    pub history: HistoryState,

    /// Dernier request_id émis (séquence monotone)
    last_request_id: u64,
}

impl App {
    /// Crée une App sans actifs, en attente de la liste
    pub fn new(default_range: TimeRange) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            assets: Vec::new(),
            market_state: MarketListState::Loading,
            highlighted: 0,
            selection: Selection {
                asset: None,
                range: default_range,
            },
            history: HistoryState::Idle,
            last_request_id: 0,
        }
    }

    /// Crée une App avec une liste d'actifs déjà chargée
    pub fn with_assets(assets: Vec<Asset>, default_range: TimeRange) -> Self {
        let mut app = Self::new(default_range);
        app.on_markets_loaded(assets);
        app
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Événements clavier
    // ========================================================================

    /// Traite un événement ; retourne la commande à envoyer au worker
    ///
    /// CONCEPT RUST : Pattern matching avec guards
    /// - Chaque branche vérifie un prédicat de ui::events
    /// - Toute touche autre que 'q' annule une demande de quit en attente
    pub fn handle_event(&mut self, event: &Event) -> Option<WorkerCommand> {
        let request = match event {
            Event::Tick => return None,

            Event::Key(_) if is_quit_event(event) => {
                // Two-step quit : première pression = confirmation, seconde = quit
                if self.is_awaiting_quit_confirmation() {
                    info!("User confirmed quit");
                    self.quit();
                } else {
                    info!("User requested quit (awaiting confirmation)");
                    self.request_quit();
                }
                return None;
            }

            Event::Key(_) => {
                self.cancel_quit();

                if is_up_event(event) {
                    self.navigate_up();
                    None
                } else if is_down_event(event) {
                    self.navigate_down();
                    None
                } else if is_page_up_event(event) {
                    self.page_up(PAGE_SIZE);
                    None
                } else if is_page_down_event(event) {
                    self.page_down(PAGE_SIZE);
                    None
                } else if is_enter_event(event) {
                    // Placeholder = pas de fetch
                    self.select_highlighted()
                } else if is_next_range_event(event) {
                    self.next_range()
                } else if is_previous_range_event(event) {
                    self.previous_range()
                } else {
                    range_from_event(event).and_then(|range| self.set_range(range))
                }
            }
        };

        request.map(HistoryRequest::into_command)
    }

    /// Applique un résultat du worker
    pub fn apply_result(&mut self, result: WorkerResult) {
        match result {
            WorkerResult::MarketsLoaded(assets) => self.on_markets_loaded(assets),
            WorkerResult::MarketsError { error } => self.on_markets_failed(error),
            WorkerResult::HistoryLoaded { request_id, series } => {
                self.on_history_loaded(request_id, series);
            }
            WorkerResult::HistoryError {
                request_id,
                asset_id,
                error,
            } => {
                debug!(request_id, asset = %asset_id, "History error received");
                self.on_history_failed(request_id, error);
            }
        }
    }

    // ========================================================================
    // Sélecteur
    // ========================================================================

    /// Nombre d'options : placeholder + un par actif
    pub fn option_count(&self) -> usize {
        self.assets.len() + 1
    }

    /// Labels des options, placeholder en tête
    pub fn selector_labels(&self) -> Vec<String> {
        std::iter::once(PLACEHOLDER_LABEL.to_string())
            .chain(self.assets.iter().map(|asset| asset.name.clone()))
            .collect()
    }

    /// Navigue vers le haut dans le sélecteur
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Navigue vers le bas dans le sélecteur
    pub fn navigate_down(&mut self) {
        let max_index = self.option_count().saturating_sub(1);
        self.highlighted = (self.highlighted + 1).min(max_index);
    }

    /// Remonte d'une page dans le sélecteur
    pub fn page_up(&mut self, page: usize) {
        self.highlighted = self.highlighted.saturating_sub(page);
    }

    /// Descend d'une page dans le sélecteur
    pub fn page_down(&mut self, page: usize) {
        let max_index = self.option_count().saturating_sub(1);
        self.highlighted = self.highlighted.saturating_add(page).min(max_index);
    }

    /// Actif sous le curseur (None sur le placeholder)
    pub fn highlighted_asset(&self) -> Option<&Asset> {
        self.highlighted
            .checked_sub(1)
            .and_then(|index| self.assets.get(index))
    }

    /// Actif sélectionné
    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selection.asset.as_ref()
    }

    /// Valide l'option surlignée
    ///
    /// Retourne la requête d'historique à lancer, ou None :
    /// - placeholder : on vide la sélection, aucun fetch
    /// - même actif déjà affiché ou en cours : rien ne change
    pub fn select_highlighted(&mut self) -> Option<HistoryRequest> {
        let asset = match self.highlighted_asset().cloned() {
            Some(asset) => asset,
            None => {
                info!("Placeholder selected, clearing selection");
                self.selection.asset = None;
                self.history = HistoryState::Idle;
                return None;
            }
        };

        let unchanged = self
            .selection
            .asset
            .as_ref()
            .map(|current| current.id == asset.id)
            .unwrap_or(false);

        if unchanged && !matches!(self.history, HistoryState::Failed { .. }) {
            debug!(asset = %asset.id, "Asset already selected");
            return None;
        }

        info!(asset = %asset.id, range = %self.selection.range.token(), "Asset selected");
        self.selection.asset = Some(asset);
        self.issue_history_request()
    }

    // ========================================================================
    // Range
    // ========================================================================

    /// Change le range ; relance un fetch si un actif est sélectionné
    pub fn set_range(&mut self, range: TimeRange) -> Option<HistoryRequest> {
        if self.selection.range == range {
            return None;
        }

        info!(range = %range.token(), "Range changed");
        self.selection.range = range;
        self.issue_history_request()
    }

    /// Range suivant (cycle)
    pub fn next_range(&mut self) -> Option<HistoryRequest> {
        self.set_range(self.selection.range.next())
    }

    /// Range précédent (cycle)
    pub fn previous_range(&mut self) -> Option<HistoryRequest> {
        self.set_range(self.selection.range.previous())
    }

    /// Émet une nouvelle requête pour la sélection courante
    ///
    /// Inerte tant qu'aucun actif n'est sélectionné
    fn issue_history_request(&mut self) -> Option<HistoryRequest> {
        let asset_id = self.selection.asset.as_ref()?.id.clone();

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.history = HistoryState::Loading { request_id };

        Some(HistoryRequest {
            request_id,
            asset_id,
            range: self.selection.range,
        })
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Liste des actifs reçue
    pub fn on_markets_loaded(&mut self, assets: Vec<Asset>) {
        info!(assets = assets.len(), "Market list applied");
        self.assets = assets;
        self.market_state = MarketListState::Loaded;
        self.highlighted = self.highlighted.min(self.assets.len());
    }

    /// Échec du chargement de la liste : elle reste vide
    pub fn on_markets_failed(&mut self, message: String) {
        warn!(error = %message, "Market list unavailable");
        self.market_state = MarketListState::Failed(message);
    }

    /// Historique reçu
    ///
    /// Appliqué seulement si request_id est celui attendu ;
    /// une réponse plus ancienne est ignorée. Retourne true si appliqué.
    pub fn on_history_loaded(&mut self, request_id: u64, series: PriceSeries) -> bool {
        if !self.is_awaiting(request_id) {
            debug!(request_id, latest = self.last_request_id, "Discarding stale history response");
            return false;
        }

        let chart = PriceChart::from_series(&series);
        info!(request_id, asset = %chart.asset_id, points = chart.data.len(), "Chart updated");
        self.history = HistoryState::Ready(chart);
        true
    }

    /// Échec de l'historique : le graphique est remplacé par l'erreur
    pub fn on_history_failed(&mut self, request_id: u64, message: String) -> bool {
        if !self.is_awaiting(request_id) {
            debug!(request_id, "Discarding stale history error");
            return false;
        }

        warn!(request_id, error = %message, "History unavailable");
        self.history = HistoryState::Failed { message };
        true
    }

    /// Vérifie si on attend la réponse `request_id`
    fn is_awaiting(&self, request_id: u64) -> bool {
        matches!(self.history, HistoryState::Loading { request_id: expected } if expected == request_id)
    }

    /// Graphique courant
    pub fn chart(&self) -> Option<&PriceChart> {
        match &self.history {
            HistoryState::Ready(chart) => Some(chart),
            _ => None,
        }
    }

    /// Vérifie si des données sont en cours de chargement
    pub fn is_loading_data(&self) -> bool {
        self.market_state == MarketListState::Loading
            || matches!(self.history, HistoryState::Loading { .. })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn assets() -> Vec<Asset> {
        vec![
            Asset::new("bitcoin", "Bitcoin"),
            Asset::new("ethereum", "Ethereum"),
            Asset::new("tether", "Tether"),
        ]
    }

    fn series(asset_id: &str, range: TimeRange, prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(1_700_000_000_000 + i as i64 * 86_400_000, p))
            .collect();
        PriceSeries::new(asset_id.to_string(), range, points)
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(TimeRange::Month);
        assert!(app.is_running());
        assert!(app.assets.is_empty());
        assert_eq!(app.market_state, MarketListState::Loading);
        assert_eq!(app.history, HistoryState::Idle);
        assert_eq!(app.option_count(), 1);
    }

    #[test]
    fn test_option_count_includes_placeholder() {
        let app = App::with_assets(assets(), TimeRange::Month);
        assert_eq!(app.option_count(), 4);

        let labels = app.selector_labels();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], PLACEHOLDER_LABEL);
        assert_eq!(labels[1], "Bitcoin");
    }

    #[test]
    fn test_navigation() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        assert_eq!(app.highlighted, 0);
        assert!(app.highlighted_asset().is_none());

        app.navigate_down();
        assert_eq!(app.highlighted_asset().unwrap().id, "bitcoin");

        for _ in 0..10 {
            app.navigate_down();
        }
        assert_eq!(app.highlighted, 3);

        app.navigate_up();
        app.navigate_up();
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.highlighted, 0);
    }

    #[test]
    fn test_page_navigation() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.page_down(10);
        assert_eq!(app.highlighted, 3);
        app.page_up(2);
        assert_eq!(app.highlighted, 1);
        app.page_up(10);
        assert_eq!(app.highlighted, 0);
    }

    #[test]
    fn test_placeholder_never_fetches() {
        let mut app = App::with_assets(assets(), TimeRange::Week);
        assert!(app.select_highlighted().is_none());
        assert_eq!(app.history, HistoryState::Idle);

        // Changer le range sans actif ne déclenche rien non plus
        assert!(app.set_range(TimeRange::Day).is_none());
        assert!(app.next_range().is_none());
        assert_eq!(app.history, HistoryState::Idle);
    }

    #[test]
    fn test_select_asset_issues_request() {
        let mut app = App::with_assets(assets(), TimeRange::Week);
        app.navigate_down();

        let request = app.select_highlighted().unwrap();
        assert_eq!(request.asset_id, "bitcoin");
        assert_eq!(request.range, TimeRange::Week);
        assert_eq!(app.history, HistoryState::Loading { request_id: request.request_id });
        assert!(app.is_loading_data());

        assert_eq!(
            request.clone().into_command(),
            WorkerCommand::LoadHistory {
                request_id: request.request_id,
                asset_id: "bitcoin".to_string(),
                range: TimeRange::Week,
            }
        );
    }

    #[test]
    fn test_history_applied() {
        let mut app = App::with_assets(assets(), TimeRange::Week);
        app.navigate_down();
        let request = app.select_highlighted().unwrap();

        assert!(app.on_history_loaded(
            request.request_id,
            series("bitcoin", TimeRange::Week, &[100.0, 110.0])
        ));

        let chart = app.chart().unwrap();
        assert_eq!(chart.title, "Price Over The Last 7 Days.");
        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data.values(), &[100.0, 110.0]);
        assert!(!app.is_loading_data());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut app = App::with_assets(assets(), TimeRange::Week);
        app.navigate_down();
        let first = app.select_highlighted().unwrap();
        let second = app.set_range(TimeRange::Day).unwrap();
        assert!(second.request_id > first.request_id);

        // La réponse la plus récente arrive d'abord
        assert!(app.on_history_loaded(
            second.request_id,
            series("bitcoin", TimeRange::Day, &[1.0, 2.0, 3.0])
        ));

        // L'ancienne arrive ensuite : ignorée
        assert!(!app.on_history_loaded(
            first.request_id,
            series("bitcoin", TimeRange::Week, &[9.0])
        ));

        let chart = app.chart().unwrap();
        assert_eq!(chart.range, TimeRange::Day);
        assert_eq!(chart.title, "Price Over The Last 24 Hours.");
        assert_eq!(chart.data.len(), 3);
    }

    #[test]
    fn test_placeholder_invalidates_inflight_request() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.navigate_down();
        let request = app.select_highlighted().unwrap();

        app.navigate_up();
        assert!(app.select_highlighted().is_none());
        assert!(app.selected_asset().is_none());

        assert!(!app.on_history_loaded(
            request.request_id,
            series("bitcoin", TimeRange::Month, &[1.0])
        ));
        assert_eq!(app.history, HistoryState::Idle);
    }

    #[test]
    fn test_history_failure_clears_chart() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.navigate_down();
        let first = app.select_highlighted().unwrap();
        app.on_history_loaded(first.request_id, series("bitcoin", TimeRange::Month, &[1.0]));
        assert!(app.chart().is_some());

        let second = app.set_range(TimeRange::Week).unwrap();
        assert!(app.on_history_failed(second.request_id, "HTTP 429".to_string()));

        assert!(app.chart().is_none());
        assert_eq!(
            app.history,
            HistoryState::Failed {
                message: "HTTP 429".to_string()
            }
        );

        // Re-valider le même actif après un échec relance le fetch
        assert!(app.select_highlighted().is_some());
    }

    #[test]
    fn test_reselecting_same_asset_is_noop() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.navigate_down();
        assert!(app.select_highlighted().is_some());
        assert!(app.select_highlighted().is_none());
        assert!(app.set_range(TimeRange::Month).is_none());
    }

    #[test]
    fn test_markets_failure_keeps_list_empty() {
        let mut app = App::new(TimeRange::Month);
        app.on_markets_failed("HTTP 503".to_string());

        assert!(app.assets.is_empty());
        assert_eq!(app.option_count(), 1);
        assert_eq!(app.market_state, MarketListState::Failed("HTTP 503".to_string()));
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(TimeRange::Month);
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_enter_on_placeholder_sends_nothing() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        assert!(app.handle_event(&key(KeyCode::Enter)).is_none());
        assert_eq!(app.history, HistoryState::Idle);
    }

    #[test]
    fn test_range_keys_without_asset_send_nothing() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        for code in [KeyCode::Char('1'), KeyCode::Char('7'), KeyCode::Char('3'), KeyCode::Char('l')] {
            assert!(app.handle_event(&key(code)).is_none());
        }
        assert_eq!(app.history, HistoryState::Idle);
        // Le range suit quand même les touches
        assert_eq!(app.selection.range, TimeRange::Day);
    }

    #[test]
    fn test_keys_to_history_command() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        assert!(app.handle_event(&key(KeyCode::Down)).is_none());

        let command = app.handle_event(&key(KeyCode::Enter));
        assert_eq!(
            command,
            Some(WorkerCommand::LoadHistory {
                request_id: 1,
                asset_id: "bitcoin".to_string(),
                range: TimeRange::Month,
            })
        );

        let command = app.handle_event(&key(KeyCode::Char('7')));
        assert_eq!(
            command,
            Some(WorkerCommand::LoadHistory {
                request_id: 2,
                asset_id: "bitcoin".to_string(),
                range: TimeRange::Week,
            })
        );

        // Même range : aucune requête
        assert!(app.handle_event(&key(KeyCode::Char('7'))).is_none());
        assert!(app.handle_event(&Event::Tick).is_none());
    }

    #[test]
    fn test_page_keys_move_highlight() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.handle_event(&key(KeyCode::PageDown));
        assert_eq!(app.highlighted, 3);
        app.handle_event(&key(KeyCode::PageUp));
        assert_eq!(app.highlighted, 0);
    }

    #[test]
    fn test_apply_result_ignores_superseded_error() {
        let mut app = App::with_assets(assets(), TimeRange::Month);
        app.handle_event(&key(KeyCode::Down));
        app.handle_event(&key(KeyCode::Enter));
        app.handle_event(&key(KeyCode::Char('1')));
        assert_eq!(app.history, HistoryState::Loading { request_id: 2 });

        app.apply_result(WorkerResult::HistoryError {
            request_id: 1,
            asset_id: "bitcoin".to_string(),
            error: "HTTP 500".to_string(),
        });
        assert_eq!(app.history, HistoryState::Loading { request_id: 2 });

        app.apply_result(WorkerResult::HistoryLoaded {
            request_id: 2,
            series: series("bitcoin", TimeRange::Day, &[1.0, 2.0]),
        });
        assert_eq!(app.chart().unwrap().range, TimeRange::Day);
    }

    #[test]
    fn test_apply_markets_results() {
        let mut app = App::new(TimeRange::Month);
        app.apply_result(WorkerResult::MarketsLoaded(assets()));
        assert_eq!(app.market_state, MarketListState::Loaded);
        assert_eq!(app.option_count(), 4);

        let mut app = App::new(TimeRange::Month);
        app.apply_result(WorkerResult::MarketsError {
            error: "HTTP 429".to_string(),
        });
        assert_eq!(app.market_state, MarketListState::Failed("HTTP 429".to_string()));
    }

    #[test]
    fn test_two_step_quit_keys() {
        let mut app = App::new(TimeRange::Month);
        app.handle_event(&key(KeyCode::Char('q')));
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        // Une autre touche annule
        app.handle_event(&key(KeyCode::Down));
        assert!(!app.is_awaiting_quit_confirmation());

        app.handle_event(&key(KeyCode::Char('q')));
        app.handle_event(&key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }
}
