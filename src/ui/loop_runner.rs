//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, the periodic UI
//! tick, and the refresh timer with `tokio::select!`.

use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::app::{App, AppEvent};

use super::events::handle_app_event;
use super::helpers::spawn_refresh;
use super::input::handle_input;
use super::render::render;
use super::Action;

/// Runs the TUI application event loop.
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// so a panic never leaves the terminal in raw mode.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up the terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // The fetch-cycle timer. 0 = manual refresh only; the startup cycle
    // below runs either way. Skip missed ticks rather than bursting after
    // a suspend.
    let refresh_minutes = app.config.refresh_interval_minutes;
    let mut refresh_interval = (refresh_minutes > 0).then(|| {
        let mut interval = tokio::time::interval(Duration::from_secs(refresh_minutes * 60));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; consumed by the startup
        // cycle spawned below, so skip it.
        interval.reset();
        interval
    });

    // Startup fetch cycle
    spawn_refresh(app, &event_tx);

    // Graceful shutdown on signals (Unix only)
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending events before blocking so background results are
        // applied promptly even during rapid input.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        let refresh_fut = async {
            match refresh_interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;  // Process in listed order for predictable behavior

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                } else if let Some(Ok(Event::Resize(_, _))) = maybe_event {
                    app.needs_redraw = true;
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            // Periodic fetch cycle (overlap with a manual refresh is
            // allowed; last event wins)
            _ = refresh_fut => {
                tracing::debug!("Refresh timer fired");
                spawn_refresh(app, &event_tx);
            }

            _ = tick_interval.tick() => {
                // Status expiry is handled at the top of the loop
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
