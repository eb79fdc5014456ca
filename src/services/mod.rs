// ============================================================================
// Module : services
// ============================================================================
// Logique client au-dessus des fournisseurs :
// - prices : rafraîchissement des prix avec repli sur valeurs fixes
// - insight : phrase de synthèse du marché avec repli sur phrases fixes
// - refresh : tâche planifiée qui rafraîchit les prix toutes les heures
//
// Aucune de ces opérations ne renvoie d'erreur : les échecs sont loggés
// puis remplacés par une valeur de repli.
// ============================================================================

pub mod insight;
pub mod prices;
pub mod refresh;

pub use insight::InsightClient;
pub use prices::PriceRefreshClient;
pub use refresh::RefreshTask;
