// ============================================================================
// Tâche planifiée : RefreshTask
// ============================================================================
// Rafraîchit les prix immédiatement puis à intervalle fixe (1h par défaut)
// et publie chaque snapshot dans un canal watch.
//
// CONCEPTS RUST :
// 1. tokio::spawn : la boucle tourne en tâche de fond sur le runtime
// 2. tokio::sync::watch : un seul producteur, la vue lit toujours la
//    dernière valeur publiée (pas d'historique)
// 3. RAII : le handle annule la tâche dans Drop, donc sur tous les
//    chemins de sortie de la vue (quit normal, erreur, panic)
//
// GARANTIES :
// - au plus une tâche par vue (le handle n'est pas Clone)
// - les rafraîchissements sont strictement séquentiels : le tick suivant
//   n'est considéré qu'après la fin du refresh en cours
// - après stop() ou drop, le fournisseur n'est plus jamais appelé
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::models::MarketSnapshot;
use crate::services::PriceRefreshClient;

/// Handle de la tâche de rafraîchissement
pub struct RefreshTask {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    /// Démarre la tâche sur le runtime courant
    ///
    /// Retourne le handle et le récepteur des snapshots. Le récepteur
    /// contient le snapshot seed tant que le premier refresh n'a pas abouti.
    ///
    /// Doit être appelé depuis un contexte tokio (runtime actif ou
    /// `Runtime::enter()`).
    pub fn start(
        client: Arc<PriceRefreshClient>,
        period: Duration,
    ) -> (Self, watch::Receiver<MarketSnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(MarketSnapshot::seed());

        info!(period_secs = period.as_secs(), "Starting price refresh task");
        let handle = tokio::spawn(run_refresh_loop(client, period, snapshot_tx));

        (
            Self {
                handle: Some(handle),
            },
            snapshot_rx,
        )
    }

    /// Arrête la tâche et attend qu'elle soit effectivement terminée
    ///
    /// Un refresh en cours est interrompu à son prochain point d'attente.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // JoinError::Cancelled attendu ici
            let _ = handle.await;
            info!("Price refresh task stopped");
        }
    }

    /// Indique si la tâche tourne encore
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Refresh task handle dropped, aborting task");
            handle.abort();
        }
    }
}

/// Boucle de rafraîchissement
///
/// Le premier tick d'un `tokio::time::interval` est immédiat : le premier
/// refresh part dès le démarrage.
async fn run_refresh_loop(
    client: Arc<PriceRefreshClient>,
    period: Duration,
    snapshot_tx: watch::Sender<MarketSnapshot>,
) {
    let mut ticker = tokio::time::interval(period);
    // Un refresh plus long que la période décale les ticks au lieu de
    // déclencher une rafale de rattrapage
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let snapshot = client.refresh().await;

        // Plus aucun récepteur : la vue a disparu sans arrêter la tâche
        if snapshot_tx.send(snapshot).is_err() {
            info!("No snapshot receiver left, refresh task exiting");
            break;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT : Horloge en pause (tokio test-util)
// - start_paused = true : le temps ne s'écoule que quand le runtime est
//   inactif ou via tokio::time::advance
// - Permet de tester un timer d'une heure instantanément
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;
    use async_trait::async_trait;

    use super::*;
    use crate::api::{MarketDataProvider, SimplePriceResponse};
    use crate::models::AssetSymbol;

    const HOUR: Duration = Duration::from_secs(3600);

    /// Faux fournisseur qui compte les appels et échoue toujours
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn simple_prices(&self, _assets: &[AssetSymbol]) -> Result<SimplePriceResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("offline")
        }
    }

    fn client_with(provider: Arc<CountingProvider>) -> Arc<PriceRefreshClient> {
        Arc::new(PriceRefreshClient::with_provider(provider, 129.0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_immediately_then_every_period() {
        let provider = Arc::new(CountingProvider::default());
        let (task, mut snapshots) = RefreshTask::start(client_with(provider.clone()), HOUR);

        // Premier refresh : immédiat
        snapshots.changed().await.unwrap();
        assert_eq!(provider.calls(), 1);
        assert_eq!(*snapshots.borrow_and_update(), MarketSnapshot::fallback());

        // Rien avant la fin de la période
        tokio::time::sleep(HOUR - Duration::from_secs(1)).await;
        assert_eq!(provider.calls(), 1);

        // Deuxième refresh après une heure
        snapshots.changed().await.unwrap();
        assert_eq!(provider.calls(), 2);

        task.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_provider_call_after_stop() {
        let provider = Arc::new(CountingProvider::default());
        let (task, mut snapshots) = RefreshTask::start(client_with(provider.clone()), HOUR);

        snapshots.changed().await.unwrap();
        assert!(task.is_running());

        task.stop().await;
        let calls_at_teardown = provider.calls();

        tokio::time::sleep(HOUR * 5).await;
        assert_eq!(provider.calls(), calls_at_teardown);

        // Le canal est fermé : plus aucun snapshot ne sera publié
        assert!(snapshots.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let provider = Arc::new(CountingProvider::default());
        let (task, mut snapshots) = RefreshTask::start(client_with(provider.clone()), HOUR);

        snapshots.changed().await.unwrap();
        drop(task);

        tokio::time::sleep(HOUR * 3).await;
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exits_when_receiver_dropped() {
        let provider = Arc::new(CountingProvider::default());
        let (task, snapshots) = RefreshTask::start(client_with(provider.clone()), HOUR);
        drop(snapshots);

        // Le premier refresh a lieu, la publication échoue, la tâche s'arrête
        tokio::time::sleep(HOUR * 2).await;
        assert_eq!(provider.calls(), 1);
        assert!(!task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_starts_with_seed() {
        let provider = Arc::new(CountingProvider::default());
        let (task, snapshots) = RefreshTask::start(client_with(provider), HOUR);

        assert_eq!(*snapshots.borrow(), MarketSnapshot::seed());
        task.stop().await;
    }
}
