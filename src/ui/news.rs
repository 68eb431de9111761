//! The headline list panel.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = if app.document.articles.is_empty() {
        vec![ListItem::new("No headlines")]
    } else {
        app.document
            .articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let selected = i == app.selected;

                // Category tag: "2. Market & Origin" → "[2]"
                let tag = article
                    .category
                    .chars()
                    .next()
                    .filter(char::is_ascii_digit)
                    .map(|c| format!("[{c}] "))
                    .unwrap_or_default();

                let title = strip_control_chars(&article.title);
                let source = article
                    .source
                    .as_deref()
                    .map(|s| format!("  · {}", strip_control_chars(s)))
                    .unwrap_or_default();

                let budget = inner_width
                    .saturating_sub(tag.len())
                    .saturating_sub(source.chars().count());
                let title = truncate_to_width(&title, budget.max(8));

                let title_style = if selected {
                    palette.headline_selected
                } else {
                    palette.headline
                };

                let mut spans = Vec::new();
                if !tag.is_empty() {
                    spans.push(Span::styled(tag, palette.headline_category));
                }
                spans.push(Span::styled(title.into_owned(), title_style));
                if !source.is_empty() {
                    spans.push(Span::styled(source, palette.headline_source));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let title = format!("Headlines ({})", app.document.articles.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.panel_border)
            .title(Span::styled(title, palette.panel_title)),
    );

    // Transient list state keeps the selection scrolled into view; the
    // selection itself lives in the view-model.
    let mut state = ListState::default();
    if !app.document.articles.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
