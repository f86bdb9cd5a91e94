// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Layout de l'écran principal
pub mod selector;  // Liste de choix de la crypto
pub mod summary;   // Résumé de la crypto sélectionnée
pub mod chart;     // Rendu du graphique ligne

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
