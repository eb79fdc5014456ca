// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// - quote : un actif suivi (USDT, BTC, ETH) et sa cotation en KES
// - snapshot : l'ensemble des trois cotations affichées
// - activity : profil et transactions fictives du mockup
// ============================================================================

pub mod activity;  // Profil utilisateur et transactions de démonstration
pub mod quote;     // AssetSymbol + PriceQuote
pub mod snapshot;  // MarketSnapshot (seed / fallback)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use leapa::models::quote::PriceQuote;
// On peut faire : use leapa::models::PriceQuote;
pub use activity::{Transaction, TransactionKind, UserProfile};
pub use quote::{group_thousands, AssetSymbol, PriceQuote};
pub use snapshot::MarketSnapshot;
