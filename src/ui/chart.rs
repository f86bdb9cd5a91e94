// ============================================================================
// Chart - Rendu du graphique de prix
// ============================================================================
// Affiche le PriceChart de la sélection courante en graphique ligne
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de points (x, y)
// 3. Axis : bornes et labels des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{App, HistoryState};
use crate::models::asset::format_price;
use crate::models::chart_data::BORDER_COLOR;
use crate::models::{PriceChart, TimeRange};

/// Dessine le panneau graphique selon l'état de l'historique
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    match &app.history {
        HistoryState::Idle => {
            render_message(frame, area, "Aucune crypto sélectionnée", Color::Gray, app.selection.range);
        }
        HistoryState::Loading { .. } => {
            render_message(frame, area, "Chargement de l'historique...", Color::Yellow, app.selection.range);
        }
        HistoryState::Failed { message } => {
            let msg = format!("Historique indisponible : {}", message);
            render_message(frame, area, &msg, Color::Red, app.selection.range);
        }
        HistoryState::Ready(chart) if chart.data.is_empty() => {
            render_message(frame, area, "Pas de données à afficher", Color::Gray, chart.range);
        }
        HistoryState::Ready(chart) => render_price_chart(frame, chart, area),
    }
}

/// Dessine le graphique ligne
///
/// CONCEPT RUST : Iterator chaining
/// - .iter().enumerate() : index = abscisse
/// - .map() : (index, prix)
fn render_price_chart(frame: &mut Frame, chart: &PriceChart, area: Rect) {
    let points: Vec<(f64, f64)> = chart
        .data
        .values()
        .iter()
        .enumerate()
        .map(|(i, &price)| (i as f64, price))
        .collect();

    // Série vide filtrée par render_chart : bornes neutres par sécurité
    let (min_price, max_price) = chart.data.value_bounds().unwrap_or((0.0, 0.0));

    // Marge de 5% ; une série plate reçoit une marge de 1% du prix
    let spread = max_price - min_price;
    let margin = if spread > 0.0 {
        spread * 0.05
    } else {
        (max_price.abs() * 0.01).max(f64::EPSILON)
    };
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    let color = Color::Rgb(BORDER_COLOR.r, BORDER_COLOR.g, BORDER_COLOR.b);
    let series_name = chart
        .data
        .datasets
        .first()
        .map(|d| d.label.clone())
        .unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name(series_name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, points.len().saturating_sub(1).max(1) as f64])
        .labels(x_axis_labels(&chart.data.labels));

    let y_axis = Axis::default()
        .title("Prix ($)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_axis_price(y_min)),
            Span::raw(format_axis_price((y_min + y_max) / 2.0)),
            Span::raw(format_axis_price(y_max)),
        ]);

    let widget = Chart::new(datasets)
        .block(chart_block(&chart.title, chart.range, Color::White))
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(widget, area);
}

/// Labels de l'axe X : premier, milieu, dernier
fn x_axis_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(labels[0].clone())],
        n => vec![
            Span::raw(labels[0].clone()),
            Span::raw(labels[n / 2].clone()),
            Span::raw(labels[n - 1].clone()),
        ],
    }
}

/// Formate un prix pour l'axe Y (décimales selon l'ordre de grandeur)
fn format_axis_price(price: f64) -> String {
    if price >= 100.0 {
        format!("${:.0}", price)
    } else if price >= 1.0 {
        format!("${:.2}", price)
    } else {
        format_price(price)
    }
}

/// Bloc du graphique : titre + sélecteur de range
fn chart_block(title: &str, active: TimeRange, border: Color) -> Block<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for range in TimeRange::ALL {
        let style = if range == active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", range.label()), style));
    }
    spans.push(Span::raw(" "));

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Line::from(spans))
}

/// Affiche un message à la place du graphique
fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color, range: TimeRange) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(text)
        .block(chart_block(&range.chart_title(), range, color))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_axis_labels() {
        let labels: Vec<String> = ["11-14", "11-15", "11-16", "11-17", "11-18"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let spans = x_axis_labels(&labels);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "11-14");
        assert_eq!(spans[1].content, "11-16");
        assert_eq!(spans[2].content, "11-18");

        assert!(x_axis_labels(&[]).is_empty());
    }

    #[test]
    fn test_format_axis_price() {
        assert_eq!(format_axis_price(64231.4), "$64231");
        assert_eq!(format_axis_price(1.5), "$1.50");
        assert_eq!(format_axis_price(0.000123), "$0.000123");
        assert_eq!(format_axis_price(0.0000000012), "$1.20e-9");
    }
}
