// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients des fournisseurs externes :
// - CoinGecko : prix USD et variation 24h des actifs suivis
// - Gemini : génération de texte (insight marché)
//
// Chaque fournisseur est caché derrière un trait async, les services en
// dépendent via Arc<dyn Trait> ce qui permet de les remplacer par des faux
// dans les tests.
// ============================================================================

pub mod coingecko; // Client API CoinGecko
pub mod gemini;    // Client API Gemini

// Re-export des types principaux
pub use coingecko::{AssetPrice, CoinGeckoClient, MarketDataProvider, SimplePriceResponse};
pub use gemini::{GeminiClient, TextGenerator};
