// ============================================================================
// Structure : MarketSnapshot
// ============================================================================
// Les trois cotations affichées par le mockup, toujours dans l'ordre
// USDT, BTC, ETH.
//
// CONCEPT RUST : Tableau de taille fixe [T; 3]
// - La longueur fait partie du type : impossible de construire un
//   snapshot à 2 ou 4 éléments
// - Un snapshot est remplacé en bloc, jamais modifié élément par élément
// ============================================================================

use crate::models::{AssetSymbol, PriceQuote};

/// Ensemble des cotations suivies
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    quotes: [PriceQuote; 3],
}

impl MarketSnapshot {
    /// Construit un snapshot à partir des trois cotations (USDT, BTC, ETH)
    pub fn new(usdt: PriceQuote, btc: PriceQuote, eth: PriceQuote) -> Self {
        debug_assert_eq!(usdt.symbol, AssetSymbol::Usdt);
        debug_assert_eq!(btc.symbol, AssetSymbol::Btc);
        debug_assert_eq!(eth.symbol, AssetSymbol::Eth);

        Self {
            quotes: [usdt, btc, eth],
        }
    }

    /// Valeurs de repli quand le fournisseur de prix est injoignable
    ///
    /// USDT ≈ 133 KES (+0.15%), BTC ≈ 8 543 000 KES (+2.4%),
    /// ETH ≈ 340 000 KES (-1.2%)
    pub fn fallback() -> Self {
        Self::new(
            PriceQuote::new(AssetSymbol::Usdt, 1.0, 133, 0.15),
            PriceQuote::new(AssetSymbol::Btc, 66000.0, 8_543_000, 2.4),
            PriceQuote::new(AssetSymbol::Eth, 2635.0, 340_000, -1.2),
        )
    }

    /// Snapshot affiché avant le premier rafraîchissement
    ///
    /// Mêmes valeurs que le repli : le mockup démarre sur des prix
    /// plausibles plutôt que sur un écran vide.
    pub fn seed() -> Self {
        Self::fallback()
    }

    /// Les cotations, dans l'ordre d'affichage
    pub fn quotes(&self) -> &[PriceQuote] {
        &self.quotes
    }

    /// Cotation d'un actif donné
    pub fn get(&self, symbol: AssetSymbol) -> &PriceQuote {
        match symbol {
            AssetSymbol::Usdt => &self.quotes[0],
            AssetSymbol::Btc => &self.quotes[1],
            AssetSymbol::Eth => &self.quotes[2],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceQuote> {
        self.quotes.iter()
    }
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self::seed()
    }
}

impl<'a> IntoIterator for &'a MarketSnapshot {
    type Item = &'a PriceQuote;
    type IntoIter = std::slice::Iter<'a, PriceQuote>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values() {
        let snapshot = MarketSnapshot::fallback();

        let usdt = snapshot.get(AssetSymbol::Usdt);
        assert_eq!(usdt.price_kes, 133);
        assert_eq!(usdt.change_24h, 0.15);

        let btc = snapshot.get(AssetSymbol::Btc);
        assert_eq!(btc.price_kes, 8_543_000);
        assert_eq!(btc.change_24h, 2.4);

        let eth = snapshot.get(AssetSymbol::Eth);
        assert_eq!(eth.price_kes, 340_000);
        assert_eq!(eth.change_24h, -1.2);
    }

    #[test]
    fn test_order_is_fixed() {
        let symbols: Vec<AssetSymbol> = MarketSnapshot::seed().iter().map(|q| q.symbol).collect();
        assert_eq!(symbols, AssetSymbol::ALL.to_vec());
    }

    #[test]
    fn test_seed_matches_fallback() {
        assert_eq!(MarketSnapshot::seed(), MarketSnapshot::fallback());
        assert_eq!(MarketSnapshot::default().quotes().len(), 3);
    }
}
