// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events; // Gestion des événements clavier
pub mod mockup; // Rendu de l'écran d'accueil de l'app

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use mockup::render;
