// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère les prix USD et la variation 24h depuis l'endpoint
// /simple/price (offre gratuite, pas de clé API, limite ~10-50 appels/min)
//
// CONCEPTS RUST :
// 1. #[async_trait] : méthode async dans un trait (object-safe)
// 2. Serde : tous les champs sont optionnels, un champ absent ou null
//    n'est pas une erreur de parsing
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::config::PriceConfig;
use crate::models::AssetSymbol;

// ============================================================================
// Structures pour parser la réponse JSON de CoinGecko
// ============================================================================
// Exemple de réponse :
// {
//   "tether":   { "usd": 1.0,     "usd_24h_change": 0.15 },
//   "bitcoin":  { "usd": 66000.0, "usd_24h_change": 2.4 },
//   "ethereum": { "usd": 2635.0,  "usd_24h_change": -1.2 }
// }
// ============================================================================

/// Prix d'un actif dans la réponse /simple/price
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssetPrice {
    #[serde(default)]
    pub usd: Option<f64>,

    #[serde(default)]
    pub usd_24h_change: Option<f64>,
}

/// Réponse complète : un champ par identifiant CoinGecko
///
/// Une entrée absente ou null vaut None ; les clés inconnues sont ignorées.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimplePriceResponse {
    #[serde(default)]
    pub tether: Option<AssetPrice>,

    #[serde(default)]
    pub bitcoin: Option<AssetPrice>,

    #[serde(default)]
    pub ethereum: Option<AssetPrice>,
}

impl SimplePriceResponse {
    /// Prix d'un actif, None s'il est absent de la réponse
    pub fn get(&self, symbol: AssetSymbol) -> Option<&AssetPrice> {
        self.slot(symbol).as_ref()
    }

    /// Ajoute (ou remplace) le prix d'un actif
    pub fn with(mut self, symbol: AssetSymbol, price: AssetPrice) -> Self {
        *self.slot_mut(symbol) = Some(price);
        self
    }

    fn slot(&self, symbol: AssetSymbol) -> &Option<AssetPrice> {
        match symbol {
            AssetSymbol::Usdt => &self.tether,
            AssetSymbol::Btc => &self.bitcoin,
            AssetSymbol::Eth => &self.ethereum,
        }
    }

    fn slot_mut(&mut self, symbol: AssetSymbol) -> &mut Option<AssetPrice> {
        match symbol {
            AssetSymbol::Usdt => &mut self.tether,
            AssetSymbol::Btc => &mut self.bitcoin,
            AssetSymbol::Eth => &mut self.ethereum,
        }
    }
}

// ============================================================================
// Trait : MarketDataProvider
// ============================================================================

/// Source de prix de marché
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Récupère le prix USD et la variation 24h des actifs demandés
    async fn simple_prices(&self, assets: &[AssetSymbol]) -> Result<SimplePriceResponse>;
}

// ============================================================================
// Implémentation HTTP
// ============================================================================

/// Client HTTP pour CoinGecko
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée le client à partir de la configuration des prix
    ///
    /// Le client reqwest est créé une seule fois puis réutilisé à chaque
    /// rafraîchissement (pool de connexions).
    pub fn new(config: &PriceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("leapa/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("Échec de la création du client HTTP CoinGecko")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    #[instrument(skip_all, fields(assets = assets.len()))]
    async fn simple_prices(&self, assets: &[AssetSymbol]) -> Result<SimplePriceResponse> {
        let url = build_simple_price_url(&self.base_url, assets);
        debug!(url = %url, "Sending HTTP request to CoinGecko");

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinGecko")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            anyhow::bail!("CoinGecko a retourné une erreur : HTTP {}", status);
        }

        let prices: SimplePriceResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinGecko")?;

        debug!(?prices, "Parsed CoinGecko response");
        Ok(prices)
    }
}

/// Construit l'URL /simple/price pour les actifs demandés
fn build_simple_price_url(base_url: &str, assets: &[AssetSymbol]) -> String {
    let ids: Vec<&str> = assets.iter().map(|a| a.provider_id()).collect();

    format!(
        "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
        base_url,
        ids.join(",")
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_simple_price_url() {
        let url = build_simple_price_url("https://api.coingecko.com/api/v3", &AssetSymbol::ALL);
        assert_eq!(
            url,
            "https://api.coingecko.com/api/v3/simple/price?ids=tether,bitcoin,ethereum&vs_currencies=usd&include_24hr_change=true"
        );
    }

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "tether": {"usd": 1, "usd_24h_change": 0.15},
            "bitcoin": {"usd": 66000, "usd_24h_change": 2.4},
            "ethereum": {"usd": 2635, "usd_24h_change": -1.2}
        }"#;

        let parsed: SimplePriceResponse = serde_json::from_str(json).unwrap();
        let btc = parsed.get(AssetSymbol::Btc).unwrap();
        assert_eq!(btc.usd, Some(66000.0));
        assert_eq!(btc.usd_24h_change, Some(2.4));
    }

    #[test]
    fn test_parse_missing_fields() {
        // Ethereum absent, Bitcoin sans prix, Tether sans variation : le parsing doit réussir
        let json = r#"{"tether": {"usd": 1.0}, "bitcoin": {"usd_24h_change": 1.0}}"#;

        let parsed: SimplePriceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.get(AssetSymbol::Usdt).unwrap().usd_24h_change, None);
        assert_eq!(parsed.get(AssetSymbol::Btc).unwrap().usd, None);
        assert!(parsed.get(AssetSymbol::Eth).is_none());
    }

    #[test]
    fn test_parse_null_entry_and_unknown_keys() {
        let json = r#"{"tether": null, "bitcoin": {"usd": 70000}, "dogecoin": {"usd": 0.1}}"#;

        let parsed: SimplePriceResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.get(AssetSymbol::Usdt).is_none());
        assert_eq!(parsed.get(AssetSymbol::Btc).unwrap().usd, Some(70000.0));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        // Port 9 (discard) : connexion refusée, sans dépendance réseau externe
        let config = PriceConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..PriceConfig::default()
        };
        let client = CoinGeckoClient::new(&config).unwrap();

        let result = client.simple_prices(&AssetSymbol::ALL).await;
        assert!(result.is_err());
    }
}
