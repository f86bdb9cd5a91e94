// ============================================================================
// Selector - Liste de choix de la crypto
// ============================================================================
// Équivalent terminal d'un menu déroulant :
// - option 0 : placeholder "Choose a currency"
// - options 1..=N : les actifs, dans l'ordre du classement
//
// CONCEPT RATATUI : ListState
// - Créé à chaque frame à partir de app.highlighted
// - ratatui calcule lui-même le scroll pour garder l'option visible
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, MarketListState};

/// Dessine le sélecteur (et l'erreur de chargement éventuelle)
pub fn render_selector(frame: &mut Frame, app: &App, area: Rect) {
    let (list_area, error_area) = match &app.market_state {
        MarketListState::Failed(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(5)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        _ => (area, None),
    };

    let title = match app.market_state {
        MarketListState::Loading => " Crypto Market (chargement...) ".to_string(),
        _ => format!(" Crypto Market ({}) ", app.assets.len()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let selected_id = app.selected_asset().map(|asset| asset.id.as_str());

    let items: Vec<ListItem> = app
        .selector_labels()
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            // index 0 = placeholder, sinon assets[index - 1]
            let asset = index.checked_sub(1).and_then(|i| app.assets.get(i));

            match asset {
                None => ListItem::new(Line::from(Span::styled(
                    label,
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ))),
                Some(asset) => {
                    let marker = if Some(asset.id.as_str()) == selected_id { "●" } else { " " };
                    let rank = asset
                        .market_cap_rank
                        .map(|r| format!("{:>3}", r))
                        .unwrap_or_else(|| "  -".to_string());

                    let change_style = if asset.is_positive() {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Red)
                    };

                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", marker), Style::default().fg(Color::Yellow)),
                        Span::styled(rank, Style::default().fg(Color::DarkGray)),
                        Span::raw(" "),
                        Span::raw(label),
                        Span::raw(" "),
                        Span::styled(
                            asset
                                .price_change_percentage_24h
                                .map(|c| format!("{:+.1}%", c))
                                .unwrap_or_default(),
                            change_style,
                        ),
                    ]))
                }
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(app.highlighted));
    frame.render_stateful_widget(list, list_area, &mut state);

    if let (Some(area), MarketListState::Failed(message)) = (error_area, &app.market_state) {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                "⚠ Liste indisponible",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}
