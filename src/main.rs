// ============================================================================
// Leapa - Mockup de l'app dans le terminal
// ============================================================================
// Affiche l'écran d'accueil de l'app Leapa (M-Pesa <-> crypto) :
// - prix USDT / BTC / ETH en KES, rafraîchis toutes les heures
// - phrase d'insight générée une fois à l'ouverture
// - solde et activité récente de démonstration
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop synchrone + runtime tokio pour le réseau
// 3. RAII : la tâche de rafraîchissement est annulée quand la vue se ferme
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tracing::{debug, error, info};

use leapa::app::App;
use leapa::config::AppConfig;
use leapa::models::MarketSnapshot;
use leapa::services::{InsightClient, PriceRefreshClient, RefreshTask};
use leapa::ui::events::{is_down_event, is_escape_event, is_quit_event, is_up_event, Event};
use leapa::ui::{render, EventHandler};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux : ~/.local/share/leapa/logs/leapa.log
/// - macOS : ~/Library/Application Support/leapa/logs/leapa.log
/// - Windows : C:\Users\<user>\AppData\Local\leapa\logs\leapa.log
/// - ./logs si aucun de ces répertoires n'existe
///
/// ```bash
/// tail -f ~/.local/share/leapa/logs/leapa.log
/// RUST_LOG=leapa=trace cargo run
/// ```
fn init_logging() -> Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("leapa").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "leapa.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // Utile : prix et insight tournent sur des workers tokio
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leapa=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(log_dir)
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    }

    info!("Leapa mockup starting up");

    // Configuration et clients AVANT le mode TUI : une erreur de config
    // s'affiche normalement dans le terminal
    let config = AppConfig::from_env()?;
    debug!(?config, "Configuration");

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let price_client = Arc::new(PriceRefreshClient::new(&config.price)?);
    let insight_client = InsightClient::new(&config.insight)?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let result = run_mockup(
        &mut terminal,
        &runtime,
        price_client,
        insight_client,
        config.refresh_period,
    );

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    // Requêtes en vol (insight) abandonnées sans attendre
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

// ============================================================================
// Cycle de vie de la vue
// ============================================================================
// Montage :
//   1. démarre la tâche de rafraîchissement (refresh immédiat + toutes les h)
//   2. demande l'insight une seule fois, à partir du snapshot seed
// Démontage :
//   3. arrête la tâche de rafraîchissement, même si la boucle a échoué
// ============================================================================

fn run_mockup(
    terminal: &mut Tui,
    runtime: &tokio::runtime::Runtime,
    price_client: Arc<PriceRefreshClient>,
    insight_client: InsightClient,
    refresh_period: Duration,
) -> Result<()> {
    let mut app = App::demo();

    // RefreshTask::start utilise tokio::spawn : il faut un contexte runtime
    let (refresh_task, mut snapshots) = {
        let _guard = runtime.enter();
        RefreshTask::start(price_client, refresh_period)
    };

    // Insight : fire-and-forget, le résultat revient par un channel
    let (insight_tx, insight_rx) = mpsc::channel::<String>();
    let seed = app.snapshot.clone();
    app.start_insight_loading();
    runtime.spawn(async move {
        let text = insight_client.summarize(&seed).await;
        // La vue peut être fermée avant la réponse
        let _ = insight_tx.send(text);
    });

    let events = EventHandler::new();
    info!("Starting event loop");
    let result = event_loop(terminal, &mut app, &events, &mut snapshots, &insight_rx);

    // Un échec de la boucle ne doit pas laisser le timer tourner
    runtime.block_on(refresh_task.stop());

    result
}

/// Boucle principale : intègre les résultats, dessine, lit le clavier
fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &EventHandler,
    snapshots: &mut watch::Receiver<MarketSnapshot>,
    insight_rx: &mpsc::Receiver<String>,
) -> Result<()> {
    while app.is_running() {
        apply_background_results(app, snapshots, insight_rx);

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event);

        app.tick();
    }

    Ok(())
}

/// Intègre les snapshots et l'insight arrivés depuis la dernière frame
fn apply_background_results(
    app: &mut App,
    snapshots: &mut watch::Receiver<MarketSnapshot>,
    insight_rx: &mpsc::Receiver<String>,
) {
    match snapshots.has_changed() {
        Ok(true) => {
            let snapshot = snapshots.borrow_and_update().clone();
            debug!("New market snapshot received");
            app.update_snapshot(snapshot, Local::now());
        }
        Ok(false) => {}
        Err(_) => {
            // La tâche s'est arrêtée : on garde le dernier snapshot connu
        }
    }

    match insight_rx.try_recv() {
        Ok(text) => {
            info!("Market insight received");
            app.set_insight(text);
        }
        Err(mpsc::TryRecvError::Empty) => {}
        Err(mpsc::TryRecvError::Disconnected) => {
            // Déjà reçu, ou tâche annulée
        }
    }
}

/// Applique un événement clavier à l'état de l'application
fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }

        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.cancel_quit();
        }

        // N'importe quelle autre touche annule la confirmation
        Event::Key(_) => {
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup / Restauration du terminal
// ============================================================================

/// Passe le terminal en mode TUI (raw mode + écran alternatif)
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal dans son état normal
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
