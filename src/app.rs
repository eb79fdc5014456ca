// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état du mockup affiché dans le terminal
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Les deux clients (prix, insight) n'écrivent que via les méthodes de App
// - Le snapshot est remplacé en bloc, jamais modifié champ par champ
// ============================================================================

use chrono::{DateTime, Local};

use crate::models::{MarketSnapshot, Transaction, UserProfile};

/// État de la phrase d'insight
///
/// CONCEPT RUST : Enum pour state machine
/// - Idle : pas encore demandée
/// - Loading : requête en cours, la vue affiche un indicateur
/// - Ready : texte reçu (réel ou repli, indiscernable pour l'utilisateur)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InsightState {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' = confirmation demandée
    pub confirm_quit: bool,

    /// Profil affiché dans l'en-tête et la carte de solde
    pub profile: UserProfile,

    /// Activité récente (données de démonstration)
    pub transactions: Vec<Transaction>,

    /// Index de la transaction sélectionnée
    pub selected_index: usize,

    /// Dernier snapshot publié par la tâche de rafraîchissement
    pub snapshot: MarketSnapshot,

    /// Heure de réception du dernier snapshot (None : seed)
    pub last_refresh: Option<DateTime<Local>>,

    /// Phrase d'insight
    pub insight: InsightState,

    /// Compteur de frames, anime l'indicateur de chargement
    pub tick_count: u64,
}

impl App {
    /// Crée une App avec un profil et une activité donnés
    pub fn new(profile: UserProfile, transactions: Vec<Transaction>) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            profile,
            transactions,
            selected_index: 0,
            snapshot: MarketSnapshot::seed(),
            last_refresh: None,
            insight: InsightState::Idle,
            tick_count: 0,
        }
    }

    /// App avec les données de démonstration du mockup
    pub fn demo() -> Self {
        Self::new(UserProfile::demo(), Transaction::demo())
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    /// Navigue vers le haut dans l'activité récente
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans l'activité récente
    pub fn navigate_down(&mut self) {
        let max_index = self.transactions.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.selected_index)
    }

    /// Remplace le snapshot affiché
    pub fn update_snapshot(&mut self, snapshot: MarketSnapshot, at: DateTime<Local>) {
        self.snapshot = snapshot;
        self.last_refresh = Some(at);
    }

    /// Marque l'insight comme en cours de chargement
    pub fn start_insight_loading(&mut self) {
        self.insight = InsightState::Loading;
    }

    /// Enregistre la phrase d'insight reçue
    pub fn set_insight(&mut self, text: String) {
        self.insight = InsightState::Ready(text);
    }

    pub fn is_loading_insight(&self) -> bool {
        self.insight == InsightState::Loading
    }

    /// Texte de l'insight, None tant qu'il n'est pas arrivé
    pub fn insight_text(&self) -> Option<&str> {
        match &self.insight {
            InsightState::Ready(text) => Some(text),
            InsightState::Idle | InsightState::Loading => None,
        }
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::demo()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
