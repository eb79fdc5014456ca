// ============================================================================
// Profil et activité récente
// ============================================================================
// Données fictives affichées par le mockup : aucune n'est chargée depuis
// le réseau, elles sont fixes pour la démonstration.
// ============================================================================

use chrono::NaiveDateTime;

/// Type de transaction (détermine l'icône et la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Paiement chez un marchand
    Payment,
    /// Achat de crypto via M-Pesa
    Buy,
    /// Vente de crypto vers M-Pesa
    Sell,
    /// Envoi à un contact
    Send,
}

impl TransactionKind {
    /// Icône affichée devant la transaction
    pub fn icon(&self) -> &'static str {
        match self {
            TransactionKind::Payment => "🛍",
            TransactionKind::Buy => "↙",
            TransactionKind::Sell => "↗",
            TransactionKind::Send => "➤",
        }
    }
}

/// Une ligne de l'activité récente
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub title: String,
    pub subtitle: String,
    pub date: NaiveDateTime,
    /// Montant crypto déjà formaté (ex: "-12.5 USDT")
    pub amount_crypto: String,
    /// Contre-valeur en KES déjà formatée (ex: "1,650 KES")
    pub amount_fiat: String,
    pub currency: String,
    pub is_positive: bool,
}

impl Transaction {
    /// Montant crypto avec signe explicite pour les entrées
    pub fn display_amount(&self) -> String {
        if self.is_positive {
            format!("+{}", self.amount_crypto)
        } else {
            self.amount_crypto.clone()
        }
    }

    /// Date au format "2024-12-03 10:20"
    pub fn display_date(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Les quatre transactions de démonstration, de la plus récente à la plus ancienne
    pub fn demo() -> Vec<Transaction> {
        vec![
            demo_tx("1", TransactionKind::Payment, "Paid KFC Galitos", "", "2024-12-03 10:20", "-12.5 USDT", "1,650 KES", false),
            demo_tx("2", TransactionKind::Buy, "Bought USDT", "", "2024-12-02 14:30", "500 USDT", "69,250 KES", true),
            demo_tx("3", TransactionKind::Sell, "Sold USDT", "", "2024-12-01 09:15", "-250 USDT", "34,375 KES", false),
            demo_tx("4", TransactionKind::Send, "Sent to Achieng Wanjiku", "(0712...)", "2024-12-01 08:45", "-35 USDT", "4,620 KES", false),
        ]
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_tx(
    id: &str,
    kind: TransactionKind,
    title: &str,
    subtitle: &str,
    date: &str,
    amount_crypto: &str,
    amount_fiat: &str,
    is_positive: bool,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        // Les dates de démo sont des littéraux valides, le défaut n'est jamais atteint
        date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap_or_default(),
        amount_crypto: amount_crypto.to_string(),
        amount_fiat: amount_fiat.to_string(),
        currency: "USDT".to_string(),
        is_positive,
    }
}

/// Profil affiché dans l'en-tête et la carte de solde
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub balance_kes: f64,
    pub balance_usdt: f64,
}

impl UserProfile {
    pub fn demo() -> Self {
        Self {
            name: "Carlos Andreas".to_string(),
            balance_kes: 108_722.25,
            balance_usdt: 820.55,
        }
    }

    /// Initiales pour l'avatar (ex: "CA")
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Solde formaté (ex: "KES 108,722.25")
    pub fn display_balance_kes(&self) -> String {
        // Arrondi au centime AVANT de séparer unités et centimes (1.999 -> 2.00)
        let total_cents = (self.balance_kes * 100.0).round() as i64;
        let sign = if total_cents < 0 { "-" } else { "" };
        let whole = (total_cents / 100).abs();
        let cents = (total_cents % 100).abs();
        format!("KES {}{}.{:02}", sign, crate::models::group_thousands(whole), cents)
    }

    /// Contre-valeur en USDT (ex: "≈ 820.55 USDT")
    pub fn display_balance_usdt(&self) -> String {
        format!("≈ {:.2} USDT", self.balance_usdt)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_transactions() {
        let txs = Transaction::demo();
        assert_eq!(txs.len(), 4);
        assert_eq!(txs[0].display_date(), "2024-12-03 10:20");
        assert_eq!(txs[1].display_amount(), "+500 USDT");
        assert_eq!(txs[2].display_amount(), "-250 USDT");
        assert_eq!(txs[3].kind, TransactionKind::Send);
    }

    #[test]
    fn test_profile_display() {
        let profile = UserProfile::demo();
        assert_eq!(profile.initials(), "CA");
        assert_eq!(profile.display_balance_kes(), "KES 108,722.25");
        assert_eq!(profile.display_balance_usdt(), "≈ 820.55 USDT");
    }

    #[test]
    fn test_balance_rounds_cents_into_units() {
        let mut profile = UserProfile::demo();

        profile.balance_kes = 1.999;
        assert_eq!(profile.display_balance_kes(), "KES 2.00");

        profile.balance_kes = 999.999;
        assert_eq!(profile.display_balance_kes(), "KES 1,000.00");

        profile.balance_kes = 0.05;
        assert_eq!(profile.display_balance_kes(), "KES 0.05");

        profile.balance_kes = -12.5;
        assert_eq!(profile.display_balance_kes(), "KES -12.50");
    }
}
