// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration depuis l'environnement (et un éventuel fichier .env)
//
// CONCEPTS RUST :
// 1. Configuration explicite : les clients reçoivent leur config dans le
//    constructeur, aucun état global
// 2. Option<String> : l'absence de clé API est un état valide (mode hors
//    ligne), pas une erreur
// 3. Result : un override mal formé fait échouer le démarrage
// ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// Variables d'environnement reconnues
pub const API_KEY_ENV_VAR: &str = "API_KEY";
pub const API_KEY_ALIAS_ENV_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_ENV_VAR: &str = "LEAPA_MODEL";
pub const PRICE_API_URL_ENV_VAR: &str = "LEAPA_PRICE_API_URL";
pub const INSIGHT_API_URL_ENV_VAR: &str = "LEAPA_INSIGHT_API_URL";
pub const REFRESH_SECS_ENV_VAR: &str = "LEAPA_REFRESH_SECS";
pub const KES_RATE_ENV_VAR: &str = "LEAPA_KES_RATE";
pub const HTTP_TIMEOUT_ENV_VAR: &str = "LEAPA_HTTP_TIMEOUT_SECS";

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_INSIGHT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Taux USD -> KES approximatif
pub const DEFAULT_KES_PER_USD: f64 = 129.0;

/// Rafraîchissement des prix : toutes les heures
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(3600);

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration du client de prix
#[derive(Debug, Clone, PartialEq)]
pub struct PriceConfig {
    /// URL de base de l'API CoinGecko (sans "/" final)
    pub api_url: String,
    /// Taux de conversion USD -> KES
    pub kes_per_usd: f64,
    pub timeout: Duration,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PRICE_API_URL.to_string(),
            kes_per_usd: DEFAULT_KES_PER_USD,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Configuration du client d'insight
///
/// CONCEPT : Capability check
/// - api_key = None : le client fonctionne en mode hors ligne
/// - api_key = Some(..) : le client appelle Gemini
#[derive(Clone, PartialEq)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_INSIGHT_API_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

// La clé ne doit jamais apparaître dans les logs
impl std::fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration complète de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub price: PriceConfig,
    pub insight: InsightConfig,
    pub refresh_period: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            price: PriceConfig::default(),
            insight: InsightConfig::default(),
            refresh_period: DEFAULT_REFRESH_PERIOD,
        }
    }
}

impl AppConfig {
    /// Charge la configuration depuis l'environnement du processus
    ///
    /// Un fichier .env dans le répertoire courant est chargé en premier
    /// s'il existe (les variables déjà définies ne sont pas écrasées).
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(?path, "Loaded .env file"),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(e).context("Échec de la lecture du fichier .env"),
        }

        Self::from_vars(&process_vars())
    }

    /// Construit la configuration à partir d'un ensemble de variables
    ///
    /// Séparé de from_env() pour pouvoir tester sans toucher à
    /// l'environnement global du processus.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut config = AppConfig::default();

        // Clé vide = pas de clé
        config.insight.api_key = get(API_KEY_ENV_VAR)
            .or_else(|| get(API_KEY_ALIAS_ENV_VAR))
            .map(str::to_string);

        if let Some(model) = get(MODEL_ENV_VAR) {
            config.insight.model = model.to_string();
        }
        if let Some(url) = get(PRICE_API_URL_ENV_VAR) {
            config.price.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get(INSIGHT_API_URL_ENV_VAR) {
            config.insight.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get(REFRESH_SECS_ENV_VAR) {
            config.refresh_period = parse_secs(REFRESH_SECS_ENV_VAR, secs)?;
        }
        if let Some(secs) = get(HTTP_TIMEOUT_ENV_VAR) {
            let timeout = parse_secs(HTTP_TIMEOUT_ENV_VAR, secs)?;
            config.price.timeout = timeout;
            config.insight.timeout = timeout;
        }
        if let Some(rate) = get(KES_RATE_ENV_VAR) {
            let rate: f64 = rate
                .parse()
                .with_context(|| format!("{} invalide : {:?}", KES_RATE_ENV_VAR, rate))?;
            if !rate.is_finite() || rate <= 0.0 {
                bail!("{} doit être strictement positif (reçu {})", KES_RATE_ENV_VAR, rate);
            }
            config.price.kes_per_usd = rate;
        }

        info!(
            insight_online = config.insight.api_key.is_some(),
            refresh_secs = config.refresh_period.as_secs(),
            kes_per_usd = config.price.kes_per_usd,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Variables du processus encodables en UTF-8
///
/// std::env::vars() panique sur une variable non UTF-8, même si on ne la
/// lit jamais : on passe par vars_os() et on ignore ces entrées.
fn process_vars() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Parse une durée en secondes strictement positive
fn parse_secs(name: &str, value: &str) -> Result<Duration> {
    let secs: u64 = value
        .parse()
        .with_context(|| format!("{} invalide : {:?}", name, value))?;
    if secs == 0 {
        bail!("{} doit être strictement positif", name);
    }
    Ok(Duration::from_secs(secs))
}

// ============================================================================
// Tests unitaires
// ============================================================================
