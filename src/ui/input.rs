//! Input handling: key presses dispatched by current view.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, ContentState, View};
use crate::util::validate_url_for_open;

use super::helpers::{spawn_content_load, spawn_refresh};
use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match app.view {
        View::Dashboard => handle_dashboard_input(app, code, event_tx),
        View::Reader => handle_reader_input(app, code, modifiers),
    }
}

fn handle_dashboard_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Char('r') => {
            app.set_status("Refreshing…");
            spawn_refresh(app, event_tx);
        }

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Home => app.selected = 0,
        KeyCode::End => {
            app.selected = app.document.articles.len().saturating_sub(1);
        }

        KeyCode::Enter => spawn_content_load(app, event_tx),

        KeyCode::Char('o') => open_selected_link(app),

        KeyCode::Char('t') => {
            app.cycle_theme();
            app.set_status(format!("Theme: {}", app.theme.name()));
        }

        _ => {}
    }
    Ok(Action::Continue)
}

fn handle_reader_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Char('b') | KeyCode::Esc => {
            app.view = View::Dashboard;
            app.reader_article = None;
            app.content_state = ContentState::Idle;
            app.scroll_offset = 0;
        }

        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_offset = app.scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            let half = (app.reader_visible_lines / 2).max(1);
            app.scroll_offset = app.scroll_offset.saturating_add(half);
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            let half = (app.reader_visible_lines / 2).max(1);
            app.scroll_offset = app.scroll_offset.saturating_sub(half);
        }
        KeyCode::Char('g') => app.scroll_offset = 0,

        KeyCode::Char('o') => open_reader_link(app),

        _ => {}
    }
    Ok(Action::Continue)
}

fn open_selected_link(app: &mut App) {
    let Some(link) = app.selected_article().map(|a| a.link.clone()) else {
        return;
    };
    open_link(app, &link);
}

fn open_reader_link(app: &mut App) {
    let Some(link) = app.reader_article.as_ref().map(|a| a.link.clone()) else {
        return;
    };
    open_link(app, &link);
}

fn open_link(app: &mut App, link: &str) {
    // Links come from remote documents: validate before handing to the
    // system opener.
    if validate_url_for_open(link).is_err() {
        app.set_status("Refusing to open invalid link");
        return;
    }
    if let Err(e) = open::that(link) {
        app.set_status(format!("Failed to open browser: {e}"));
    } else {
        app.set_status("Opened in browser");
    }
}
