// ============================================================================
// API Client : Gemini (génération de texte)
// ============================================================================
// Envoie un prompt à l'endpoint REST generateContent et renvoie le texte
// produit par le modèle.
//
// POST {base}/models/{model}:generateContent
// Header : x-goog-api-key
// Body   : {"contents": [{"parts": [{"text": "..."}]}]}
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::InsightConfig;

// ============================================================================
// Requête
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

// ============================================================================
// Réponse
// ============================================================================
// Tout est optionnel : une réponse sans candidat (ex: bloquée par les
// filtres de sécurité) reste une réponse valide, sans texte.
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Texte du premier candidat, None s'il est absent ou vide
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

// ============================================================================
// Trait : TextGenerator
// ============================================================================

/// Fournisseur de génération de texte
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Génère une réponse au prompt
    ///
    /// Ok(None) : le fournisseur a répondu sans texte exploitable
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

// ============================================================================
// Implémentation HTTP
// ============================================================================

/// Client HTTP pour l'API Gemini
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Crée le client pour un modèle donné
    pub fn new(config: &InsightConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Échec de la création du client HTTP Gemini")?;

        Ok(Self {
            client,
            endpoint: build_endpoint(&config.api_url, &config.model),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        debug!("Sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .context("Échec de la requête HTTP vers Gemini")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini returned error status");
            anyhow::bail!("Gemini a retourné une erreur : HTTP {}", status);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse Gemini")?;

        Ok(parsed.text())
    }
}

/// URL complète de l'endpoint generateContent pour un modèle
fn build_endpoint(api_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_url.trim_end_matches('/'),
        model
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_endpoint() {
        let endpoint = build_endpoint(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-3-flash-preview",
        );
        assert_eq!(
            endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hello")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "HODL "}, {"text": "strong! "}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("HODL strong!"));
    }

    #[test]
    fn test_response_without_text() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let blank: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.text(), None);

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }
}
