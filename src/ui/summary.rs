// ============================================================================
// Summary - Résumé de la crypto sélectionnée
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::asset::{format_compact, format_price};
use crate::models::Asset;

/// Dessine le panneau de résumé
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Résumé ");

    let text = match app.selected_asset() {
        Some(asset) => summary_lines(asset),
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Choisissez une crypto dans la liste puis [Enter]",
                Style::default().fg(Color::Gray),
            )),
        ],
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Lignes du résumé : nom, prix + variation, puis métriques de marché
fn summary_lines(asset: &Asset) -> Vec<Line<'static>> {
    let color = if asset.is_positive() { Color::Green } else { Color::Red };
    let na = || "N/A".to_string();

    let mut price_line = vec![
        Span::raw("Prix: "),
        Span::styled(
            asset.current_price.map(format_price).unwrap_or_else(na),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(change) = asset.change_display() {
        price_line.push(Span::raw("  "));
        price_line.push(Span::styled(change, Style::default().fg(color)));
    }
    if let Some(abs_change) = asset.price_change_24h {
        price_line.push(Span::styled(
            format!(" ({:+.2})", abs_change),
            Style::default().fg(color),
        ));
    }

    vec![
        Line::from(Span::styled(
            asset.display_name(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(price_line),
        Line::from(format!(
            "Rang #{}   Market cap {}   Volume 24h {}",
            asset
                .market_cap_rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            asset.market_cap.map(format_compact).unwrap_or_else(na),
            asset.total_volume.map(format_compact).unwrap_or_else(na),
        )),
        Line::from(format!(
            "24h haut {}   bas {}",
            asset.high_24h.map(format_price).unwrap_or_else(na),
            asset.low_24h.map(format_price).unwrap_or_else(na),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_summary_lines() {
        let mut asset = Asset::new("bitcoin", "Bitcoin");
        asset.symbol = "btc".to_string();
        asset.current_price = Some(64231.5);
        asset.price_change_percentage_24h = Some(-0.79);
        asset.market_cap_rank = Some(1);
        asset.market_cap = Some(1_270_000_000_000.0);

        let lines = summary_lines(&asset);
        assert_eq!(lines.len(), 4);
        assert_eq!(line_text(&lines[0]), "Bitcoin (BTC)");
        assert!(line_text(&lines[1]).contains("$64,231.50"));
        assert!(line_text(&lines[1]).contains("▼ -0.79%"));
        assert!(line_text(&lines[2]).contains("Rang #1"));
        assert!(line_text(&lines[2]).contains("$1.27T"));
        assert!(line_text(&lines[3]).contains("N/A"));
    }
}
