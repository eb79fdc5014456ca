// ============================================================================
// Structure : PriceQuote
// ============================================================================
// Représente la cotation d'un actif suivi, convertie en shillings kényans
//
// CONCEPTS RUST :
// 1. Enum fermé (AssetSymbol) : l'ensemble des actifs est fixe, le
//    compilateur garantit qu'on gère USDT, BTC et ETH partout
// 2. Immutabilité : une PriceQuote n'a aucune méthode &mut self, on la
//    remplace entièrement à chaque rafraîchissement
// ============================================================================

use std::fmt;

use serde::Serialize;

/// Actifs suivis par le mockup
///
/// L'ordre de déclaration est l'ordre d'affichage (USDT, BTC, ETH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetSymbol {
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
}

impl AssetSymbol {
    /// Tous les actifs, dans l'ordre d'affichage
    pub const ALL: [AssetSymbol; 3] = [AssetSymbol::Usdt, AssetSymbol::Btc, AssetSymbol::Eth];

    /// Ticker affiché (ex: "BTC")
    pub fn ticker(&self) -> &'static str {
        match self {
            AssetSymbol::Usdt => "USDT",
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
        }
    }

    /// Nom complet (ex: "Bitcoin")
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetSymbol::Usdt => "Tether",
            AssetSymbol::Btc => "Bitcoin",
            AssetSymbol::Eth => "Ethereum",
        }
    }

    /// Identifiant de l'actif chez CoinGecko
    pub fn provider_id(&self) -> &'static str {
        match self {
            AssetSymbol::Usdt => "tether",
            AssetSymbol::Btc => "bitcoin",
            AssetSymbol::Eth => "ethereum",
        }
    }

    /// Glyphe de la pastille de la carte marché
    pub fn glyph(&self) -> &'static str {
        match self {
            AssetSymbol::Usdt => "$",
            AssetSymbol::Btc => "₿",
            AssetSymbol::Eth => "Ξ",
        }
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

/// Cotation d'un actif
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Actif coté
    pub symbol: AssetSymbol,

    /// Nom complet (ex: "Bitcoin")
    pub display_name: String,

    /// Prix en USD tel que renvoyé par le fournisseur
    pub price_usd: f64,

    /// Prix en KES, arrondi à l'unité
    pub price_kes: i64,

    /// Variation sur 24h en pourcentage, arrondie à 2 décimales
    pub change_24h: f64,
}

impl PriceQuote {
    /// Crée une cotation ; le nom complet est déduit du symbole
    pub fn new(symbol: AssetSymbol, price_usd: f64, price_kes: i64, change_24h: f64) -> Self {
        Self {
            symbol,
            display_name: symbol.display_name().to_string(),
            price_usd,
            price_kes,
            change_24h,
        }
    }

    /// Convertit un prix USD en cotation KES
    ///
    /// - prix : round(usd × taux)
    /// - variation : arrondie à 2 décimales
    pub fn from_usd(symbol: AssetSymbol, price_usd: f64, change_24h: f64, kes_per_usd: f64) -> Self {
        let price_kes = (price_usd * kes_per_usd).round() as i64;
        Self::new(symbol, price_usd, price_kes, round_2dp(change_24h))
    }

    /// Retourne true si l'actif est stable ou en hausse
    pub fn is_positive(&self) -> bool {
        self.change_24h >= 0.0
    }

    /// Formatte le prix pour l'affichage (ex: "KES 8,543,000")
    pub fn display_price(&self) -> String {
        format!("KES {}", group_thousands(self.price_kes))
    }

    /// Formatte la variation avec flèche (ex: "▲ +2.4%", "▼ -1.2%")
    pub fn display_change(&self) -> String {
        let arrow = if self.is_positive() { "▲" } else { "▼" };
        let sign = if self.change_24h > 0.0 { "+" } else { "" };
        format!("{} {}{}%", arrow, sign, self.change_24h)
    }
}

/// Arrondi à 2 décimales
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Insère des séparateurs de milliers (ex: 8543000 -> "8,543,000")
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
