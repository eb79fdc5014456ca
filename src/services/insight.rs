// ============================================================================
// Service : InsightClient
// ============================================================================
// Demande au modèle une phrase de synthèse du marché
//
// CONTRAT :
// - summarize() ne renvoie jamais d'erreur
// - pas de clé API : message "connectez votre clé", aucun appel réseau
// - erreur du fournisseur : message "insights indisponibles"
// - réponse vide : phrase générique
// ============================================================================

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::api::{GeminiClient, TextGenerator};
use crate::config::InsightConfig;
use crate::models::{AssetSymbol, MarketSnapshot};

/// Message quand aucune clé API n'est configurée
pub const NO_KEY_MESSAGE: &str =
    "Connect your API Key to get real-time market insights powered by Gemini.";

/// Message quand le fournisseur échoue
pub const UNAVAILABLE_MESSAGE: &str = "Unable to fetch insights at the moment.";

/// Message quand le fournisseur répond sans texte
pub const EMPTY_RESPONSE_MESSAGE: &str = "Market looks interesting today!";

/// Ligne du snapshot telle qu'envoyée au modèle
#[derive(Debug, Serialize)]
struct PromptToken<'a> {
    symbol: AssetSymbol,
    name: &'a str,
    price: i64,
    change: f64,
}

/// Client d'insight marché
///
/// CONCEPT : Capability check au constructeur
/// - generator = None : mode hors ligne, décidé une fois pour toutes
/// - generator = Some(..) : appel au fournisseur à chaque summarize()
pub struct InsightClient {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl InsightClient {
    /// Crée le client à partir de la configuration
    ///
    /// Sans clé API, aucun client HTTP n'est construit.
    pub fn new(config: &InsightConfig) -> Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match &config.api_key {
            Some(key) => {
                info!(model = %config.model, "Insight client online");
                Some(Arc::new(GeminiClient::new(config, key.clone())?))
            }
            None => {
                info!("No API key configured, insight client offline");
                None
            }
        };

        Ok(Self { generator })
    }

    /// Crée le client avec un générateur quelconque (ou aucun)
    pub fn with_generator(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Indique si un fournisseur est configuré
    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    /// Produit une phrase de synthèse pour le snapshot
    #[instrument(skip_all)]
    pub async fn summarize(&self, snapshot: &MarketSnapshot) -> String {
        let Some(generator) = &self.generator else {
            debug!("Insight client offline, skipping provider call");
            return NO_KEY_MESSAGE.to_string();
        };

        let prompt = match build_prompt(snapshot) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = ?e, "Failed to build insight prompt");
                return UNAVAILABLE_MESSAGE.to_string();
            }
        };

        match generator.generate(&prompt).await {
            Ok(Some(text)) => {
                info!(insight = %text, "Market insight generated");
                text
            }
            Ok(None) => {
                warn!("Provider returned no insight text");
                EMPTY_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(error = ?e, "Failed to fetch market insight");
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}

/// Construit le prompt envoyé au modèle
fn build_prompt(snapshot: &MarketSnapshot) -> Result<String> {
    let tokens: Vec<PromptToken> = snapshot
        .iter()
        .map(|quote| PromptToken {
            symbol: quote.symbol,
            name: &quote.display_name,
            price: quote.price_kes,
            change: quote.change_24h,
        })
        .collect();

    let trends = serde_json::to_string(&tokens)?;

    Ok(format!(
        "You are a financial analyst for a crypto app called Leapa in Kenya.\n\
         Analyze these 24h market trends:\n\
         {}\n\
         \n\
         Provide a 1-sentence witty or encouraging summary for a young user.\n\
         Keep it under 20 words.",
        trends
    ))
}

// ============================================================================
// Tests unitaires
// ============================================================================
