// ============================================================================
// Leapa - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;      // Clients CoinGecko et Gemini
pub mod app;      // État du mockup
pub mod config;   // Configuration (environnement + .env)
pub mod models;   // Structures de données
pub mod services; // Rafraîchissement des prix, insight, tâche planifiée
pub mod ui;       // Interface utilisateur
