//! The market panel: one line per tracked commodity.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, QuoteSlot};
use crate::market::Trend;

use super::helpers::{format_relative_time, parse_updated_at};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let palette = &app.palette;

    let mut title_spans = vec![Span::styled("Coffee Futures", palette.panel_title)];
    let updated = format_relative_time(parse_updated_at(&app.document.updated_at));
    if !updated.is_empty() {
        title_spans.push(Span::styled(
            format!(" — updated {updated} ago"),
            palette.updated_at,
        ));
    }
    if app.is_demo() {
        title_spans.push(Span::styled(" [DEMO DATA]", palette.demo_badge));
    }

    let label_width = app
        .quotes
        .iter()
        .map(|(t, _)| t.label.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = app
        .quotes
        .iter()
        .map(|(ticker, slot)| {
            let mut spans = vec![
                Span::styled(
                    format!(" {:<width$}  ", ticker.label, width = label_width),
                    palette.quote_label,
                ),
                Span::styled(format!("{:<6} ", ticker.symbol), palette.quote_label),
            ];

            match slot {
                QuoteSlot::Loading => {
                    spans.push(Span::styled("loading…", palette.quote_neutral));
                }
                QuoteSlot::Failed => {
                    // The inert degradation for market data: a status
                    // string, never an error
                    spans.push(Span::styled("load failed", palette.quote_failed));
                }
                QuoteSlot::Loaded(view) => {
                    let trend_style = match view.trend {
                        Trend::Up => palette.quote_up,
                        Trend::Down => palette.quote_down,
                        Trend::Neutral => palette.quote_neutral,
                    };
                    spans.push(Span::styled(
                        format!("{:>12}  ", view.format_price()),
                        palette.quote_price,
                    ));
                    spans.push(Span::styled(view.format_delta(), trend_style));
                }
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.panel_border)
            .title(Line::from(title_spans)),
    );
    f.render_widget(paragraph, area);
}
