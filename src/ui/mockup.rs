// ============================================================================
// Mockup - Écran d'accueil de l'app Leapa
// ============================================================================
// Dessine l'écran d'accueil du téléphone dans le terminal :
//
//   ┌ en-tête : avatar + salutation ──────────────┐
//   ┌ carte de solde ─────────────────────────────┐
//   ┌ USDT ─────┐┌ BTC ──────┐┌ ETH ──────┐
//   ┌ ✨ insight ─────────────────────────────────┐
//   ┌ activité récente ───────────────────────────┐
//   ┌ raccourcis ─────────────────────────────────┐
//
// CONCEPTS RATATUI :
// 1. Layout : découpage vertical puis horizontal (cartes marché)
// 2. Widgets : Block, Paragraph, List
// 3. Style : vert/rouge selon le signe de la variation
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InsightState};
use crate::models::{AssetSymbol, PriceQuote, TransactionKind};

/// Frames de l'indicateur de chargement de l'insight
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Dessine l'écran complet
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // En-tête
            Constraint::Length(6), // Carte de solde
            Constraint::Length(6), // Cartes marché
            Constraint::Length(4), // Insight
            Constraint::Min(4),    // Activité récente
            Constraint::Length(3), // Raccourcis
        ])
        .split(frame.size());

    render_header(frame, app, chunks[0]);
    render_balance_card(frame, app, chunks[1]);
    render_market(frame, app, chunks[2]);
    render_insight(frame, app, chunks[3]);
    render_activity(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

// ============================================================================
// En-tête
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Leapa ")
        .title_alignment(Alignment::Center);

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.profile.initials()),
            Style::default()
                .fg(Color::Blue)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Hello, "),
        Span::styled(
            app.profile.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("   🔔", Style::default().fg(Color::Red)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Carte de solde
// ============================================================================

fn render_balance_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Portfolio Value ");

    let text = vec![
        Line::from(Span::styled(
            app.profile.display_balance_kes(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.profile.display_balance_usdt(),
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[↙ Receive]", Style::default().fg(Color::Cyan)),
            Span::raw("   "),
            Span::styled("[➤ Send]", Style::default().fg(Color::Cyan)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Cartes marché
// ============================================================================

fn render_market(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (quote, card_area) in app.snapshot.iter().zip(cards.iter()) {
        render_market_card(frame, quote, *card_area);
    }
}

fn render_market_card(frame: &mut Frame, quote: &PriceQuote, area: Rect) {
    let accent = match quote.symbol {
        AssetSymbol::Usdt => Color::Green,
        AssetSymbol::Btc => Color::Yellow,
        AssetSymbol::Eth => Color::Blue,
    };
    let change_color = if quote.is_positive() {
        Color::Green
    } else {
        Color::Red
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" {} {} ", quote.symbol.glyph(), quote.symbol),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(Span::styled("Price", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            quote.display_price(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            quote.display_change(),
            Style::default().fg(change_color),
        )),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Insight
// ============================================================================

fn render_insight(frame: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER[(app.tick_count as usize) % SPINNER.len()];

    let title = match app.insight {
        InsightState::Loading => format!(" {} AI Insight ", spinner),
        InsightState::Idle | InsightState::Ready(_) => " ✨ AI Insight ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);

    let line = match &app.insight {
        InsightState::Ready(text) => Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(Color::White),
        )),
        InsightState::Idle | InsightState::Loading => Line::from(Span::styled(
            "Analyzing market...",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Activité récente
// ============================================================================

fn render_activity(frame: &mut Frame, app: &App, area: Rect) {
    let updated = match app.last_refresh {
        Some(at) => format!(" Recent Activity · prices {} ", at.format("%H:%M")),
        None => " Recent Activity ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(updated);

    let items: Vec<ListItem> = app
        .transactions
        .iter()
        .enumerate()
        .map(|(index, tx)| {
            let icon_color = match tx.kind {
                TransactionKind::Payment => Color::Magenta,
                TransactionKind::Buy => Color::Green,
                TransactionKind::Sell => Color::Red,
                TransactionKind::Send => Color::Blue,
            };
            let amount_style = if tx.is_positive {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let title = if tx.subtitle.is_empty() {
                tx.title.clone()
            } else {
                format!("{} {}", tx.title, tx.subtitle)
            };

            let line = Line::from(vec![
                Span::styled(format!(" {} ", tx.kind.icon()), Style::default().fg(icon_color)),
                Span::raw(format!("{:<34}", title)),
                Span::styled(format!("{:>12}", tx.display_amount()), amount_style),
                Span::styled(
                    format!("  {:>11}  {}", tx.amount_fiat, tx.display_date()),
                    Style::default().fg(Color::Gray),
                ),
            ]);

            let mut item = ListItem::new(line);
            if index == app.selected_index {
                item = item.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            item
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Footer : raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Activity"),
        ])
    };

    let paragraph = Paragraph::new(shortcuts)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT RATATUI : TestBackend
// - Backend en mémoire, permet d'inspecter le buffer rendu
// ============================================================================
