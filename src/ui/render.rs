//! Render dispatch: routes to the appropriate view and guards against
//! unusable terminal sizes.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

use super::{market, news, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Layout math assumes at least one cell; bail on degenerate sizes
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Dashboard => render_dashboard(f, app),
        View::Reader => render_reader(f, app),
    }
}

/// Dashboard: market panel on top, headlines below, status bar last.
fn render_dashboard(f: &mut Frame, app: &App) {
    let market_height = app.quotes.len() as u16 + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(market_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    market::render(f, app, chunks[0]);
    news::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);
}

/// Reader: content fills the screen above the status bar.
fn render_reader(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    reader::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}
