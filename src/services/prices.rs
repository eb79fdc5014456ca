// ============================================================================
// Service : PriceRefreshClient
// ============================================================================
// Récupère les cotations USDT / BTC / ETH et les convertit en KES
//
// CONTRAT :
// - refresh() ne renvoie jamais d'erreur
// - succès : prix KES = round(usd × taux), variation arrondie à 2 décimales
// - échec (réseau, HTTP, JSON, timeout) : snapshot de repli fixe
// - champ absent : prix 0 (1 pour USDT), variation 0
// ============================================================================

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::api::{CoinGeckoClient, MarketDataProvider, SimplePriceResponse};
use crate::config::PriceConfig;
use crate::models::{AssetSymbol, MarketSnapshot, PriceQuote};

/// Client de rafraîchissement des prix
///
/// CONCEPT RUST : Arc<dyn Trait>
/// - Le fournisseur est partagé (la tâche planifiée garde un Arc du client)
/// - dyn MarketDataProvider : CoinGecko en production, un faux en test
pub struct PriceRefreshClient {
    provider: Arc<dyn MarketDataProvider>,
    kes_per_usd: f64,
}

impl PriceRefreshClient {
    /// Crée le client branché sur CoinGecko
    pub fn new(config: &PriceConfig) -> Result<Self> {
        let provider = CoinGeckoClient::new(config)?;
        Ok(Self::with_provider(Arc::new(provider), config.kes_per_usd))
    }

    /// Crée le client avec un fournisseur quelconque
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>, kes_per_usd: f64) -> Self {
        Self {
            provider,
            kes_per_usd,
        }
    }

    /// Récupère un nouveau snapshot, ou le snapshot de repli en cas d'échec
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> MarketSnapshot {
        match self.provider.simple_prices(&AssetSymbol::ALL).await {
            Ok(response) => {
                let snapshot = snapshot_from_response(&response, self.kes_per_usd);
                info!(
                    usdt = snapshot.get(AssetSymbol::Usdt).price_kes,
                    btc = snapshot.get(AssetSymbol::Btc).price_kes,
                    eth = snapshot.get(AssetSymbol::Eth).price_kes,
                    "Crypto prices refreshed"
                );
                snapshot
            }
            Err(e) => {
                warn!(error = ?e, "Failed to fetch crypto prices, using fallback snapshot");
                MarketSnapshot::fallback()
            }
        }
    }
}

/// Convertit une réponse CoinGecko en snapshot KES
///
/// Ne peut pas échouer : chaque champ manquant est remplacé par sa valeur
/// par défaut.
pub fn snapshot_from_response(response: &SimplePriceResponse, kes_per_usd: f64) -> MarketSnapshot {
    MarketSnapshot::new(
        quote_from_response(response, AssetSymbol::Usdt, kes_per_usd),
        quote_from_response(response, AssetSymbol::Btc, kes_per_usd),
        quote_from_response(response, AssetSymbol::Eth, kes_per_usd),
    )
}

fn quote_from_response(
    response: &SimplePriceResponse,
    symbol: AssetSymbol,
    kes_per_usd: f64,
) -> PriceQuote {
    let entry = response.get(symbol);

    // Un prix nul est traité comme absent
    let price_usd = entry
        .and_then(|p| p.usd)
        .filter(|usd| *usd != 0.0)
        .unwrap_or_else(|| missing_price_default(symbol));

    let change = entry.and_then(|p| p.usd_24h_change).unwrap_or(0.0);

    PriceQuote::from_usd(symbol, price_usd, change, kes_per_usd)
}

/// Prix USD utilisé quand le fournisseur n'en donne pas
///
/// USDT est un stablecoin : 1 USD est une meilleure estimation que 0.
fn missing_price_default(symbol: AssetSymbol) -> f64 {
    match symbol {
        AssetSymbol::Usdt => 1.0,
        AssetSymbol::Btc | AssetSymbol::Eth => 0.0,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::AssetPrice;

    /// Faux fournisseur renvoyant toujours la même réponse
    struct StaticProvider(SimplePriceResponse);

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn simple_prices(&self, _assets: &[AssetSymbol]) -> Result<SimplePriceResponse> {
            Ok(self.0.clone())
        }
    }

    /// Faux fournisseur simulant une panne réseau
    #[derive(Default)]
    struct FailingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for FailingProvider {
        async fn simple_prices(&self, _assets: &[AssetSymbol]) -> Result<SimplePriceResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection reset by peer")
        }
    }

    fn price(usd: f64, change: f64) -> AssetPrice {
        AssetPrice {
            usd: Some(usd),
            usd_24h_change: Some(change),
        }
    }

    #[test]
    fn test_conversion_at_129() {
        let json = r#"{
            "tether": {"usd": 1, "usd_24h_change": 0.15},
            "bitcoin": {"usd": 66000, "usd_24h_change": 2.4},
            "ethereum": {"usd": 2635, "usd_24h_change": -1.2}
        }"#;
        let response: SimplePriceResponse = serde_json::from_str(json).unwrap();

        let snapshot = snapshot_from_response(&response, 129.0);

        let usdt = snapshot.get(AssetSymbol::Usdt);
        assert_eq!(usdt.price_kes, 129);
        assert_eq!(usdt.change_24h, 0.15);

        let btc = snapshot.get(AssetSymbol::Btc);
        assert_eq!(btc.price_kes, 8_514_000);
        assert_eq!(btc.change_24h, 2.4);

        let eth = snapshot.get(AssetSymbol::Eth);
        assert_eq!(eth.price_kes, 339_915);
        assert_eq!(eth.change_24h, -1.2);
    }

    #[test]
    fn test_change_rounded_to_two_places() {
        let response = SimplePriceResponse::default().with(AssetSymbol::Btc, price(66000.0, 2.41789));
        let snapshot = snapshot_from_response(&response, 129.0);
        assert_eq!(snapshot.get(AssetSymbol::Btc).change_24h, 2.42);
    }

    #[test]
    fn test_empty_response_uses_defaults() {
        let snapshot = snapshot_from_response(&SimplePriceResponse::default(), 129.0);

        let usdt = snapshot.get(AssetSymbol::Usdt);
        assert_eq!(usdt.price_usd, 1.0);
        assert_eq!(usdt.price_kes, 129);
        assert_eq!(usdt.change_24h, 0.0);

        for symbol in [AssetSymbol::Btc, AssetSymbol::Eth] {
            let quote = snapshot.get(symbol);
            assert_eq!(quote.price_kes, 0);
            assert_eq!(quote.change_24h, 0.0);
        }
    }

    #[test]
    fn test_partial_fields() {
        let json = r#"{"tether": {"usd_24h_change": 0.3}, "bitcoin": {"usd": 70000}}"#;
        let response: SimplePriceResponse = serde_json::from_str(json).unwrap();

        let snapshot = snapshot_from_response(&response, 129.0);

        assert_eq!(snapshot.get(AssetSymbol::Usdt).price_kes, 129);
        assert_eq!(snapshot.get(AssetSymbol::Usdt).change_24h, 0.3);
        assert_eq!(snapshot.get(AssetSymbol::Btc).price_kes, 9_030_000);
        assert_eq!(snapshot.get(AssetSymbol::Btc).change_24h, 0.0);
        assert_eq!(snapshot.get(AssetSymbol::Eth).price_kes, 0);
    }

    #[test]
    fn test_null_entry_only_defaults_that_asset() {
        let json = r#"{
            "tether": null,
            "bitcoin": {"usd": 70000, "usd_24h_change": 1.5},
            "ethereum": {"usd": 2635, "usd_24h_change": -1.2}
        }"#;
        let response: SimplePriceResponse = serde_json::from_str(json).unwrap();

        let snapshot = snapshot_from_response(&response, 129.0);

        assert_eq!(snapshot.get(AssetSymbol::Usdt).price_kes, 129);
        assert_eq!(snapshot.get(AssetSymbol::Usdt).change_24h, 0.0);
        assert_eq!(snapshot.get(AssetSymbol::Btc).price_kes, 9_030_000);
        assert_eq!(snapshot.get(AssetSymbol::Eth).price_kes, 339_915);
    }

    #[tokio::test]
    async fn test_refresh_with_null_entry_is_not_fallback() {
        let json = r#"{"tether": null, "bitcoin": {"usd": 70000}, "ethereum": {"usd": 2635}}"#;
        let response: SimplePriceResponse = serde_json::from_str(json).unwrap();
        let client = PriceRefreshClient::with_provider(Arc::new(StaticProvider(response)), 129.0);

        let snapshot = client.refresh().await;

        assert_ne!(snapshot, MarketSnapshot::fallback());
        assert_eq!(snapshot.get(AssetSymbol::Btc).price_kes, 9_030_000);
    }

    #[test]
    fn test_zero_usdt_price_treated_as_missing() {
        let response = SimplePriceResponse::default().with(AssetSymbol::Usdt, price(0.0, 0.0));
        let snapshot = snapshot_from_response(&response, 129.0);
        assert_eq!(snapshot.get(AssetSymbol::Usdt).price_kes, 129);
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let response = SimplePriceResponse::default()
            .with(AssetSymbol::Usdt, price(1.0, 0.15))
            .with(AssetSymbol::Btc, price(66000.0, 2.4))
            .with(AssetSymbol::Eth, price(2635.0, -1.2));
        let client = PriceRefreshClient::with_provider(Arc::new(StaticProvider(response)), 129.0);

        let snapshot = client.refresh().await;
        assert_eq!(snapshot.get(AssetSymbol::Btc).price_kes, 8_514_000);
        assert_ne!(snapshot, MarketSnapshot::fallback());
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_fallback() {
        let provider = Arc::new(FailingProvider::default());
        let client = PriceRefreshClient::with_provider(provider.clone(), 129.0);

        let snapshot = client.refresh().await;

        assert_eq!(snapshot, MarketSnapshot::fallback());
        assert_eq!(snapshot.get(AssetSymbol::Usdt).price_kes, 133);
        assert_eq!(snapshot.get(AssetSymbol::Btc).price_kes, 8_543_000);
        assert_eq!(snapshot.get(AssetSymbol::Eth).price_kes, 340_000);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_unreachable_coingecko_returns_fallback() {
        let config = PriceConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..PriceConfig::default()
        };
        let client = PriceRefreshClient::new(&config).unwrap();

        assert_eq!(client.refresh().await, MarketSnapshot::fallback());
    }
}
