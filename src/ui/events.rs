//! Application event handling: background task results applied to the
//! view-model.

use crate::app::{App, AppEvent, ContentState, QuoteSlot};

use super::reader::render_markdown;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::DocumentResolved(resolved) => {
            app.refreshing = false;
            let was_demo = resolved.is_demo();
            let count = resolved.document.articles.len();
            app.apply_document(resolved);

            if was_demo {
                app.set_status("All sources failed — showing demo data");
            } else {
                app.set_status(format!("Loaded {count} headlines"));
            }
        }

        AppEvent::QuoteLoaded { slot, result } => {
            let Some((ticker, state)) = app.quotes.get_mut(slot) else {
                return;
            };
            match result {
                Ok(view) => *state = QuoteSlot::Loaded(view),
                Err(error) => {
                    tracing::warn!(symbol = %ticker.symbol, error = %error, "Quote fetch failed");
                    // Keep the last good quote if one is already showing;
                    // only an empty slot degrades to the failed string.
                    if matches!(state, QuoteSlot::Loading) {
                        *state = QuoteSlot::Failed;
                    }
                }
            }
        }

        AppEvent::ContentLoaded { link, result } => {
            // Stale guard: the user may have left the reader or opened a
            // different article while this load was in flight.
            let current = app.reader_article.as_ref().map(|a| a.link.as_str());
            if current != Some(link.as_str()) {
                tracing::debug!(link = %link, "Dropping stale content load");
                return;
            }

            match result {
                Ok(content) => {
                    let rendered_lines = render_markdown(&content.markdown, &app.palette);
                    if content.from_cache {
                        app.set_status("Offline — showing cached copy");
                    }
                    app.content_state = ContentState::Loaded {
                        rendered_lines,
                        from_cache: content.from_cache,
                    };
                }
                Err(error) => {
                    let fallback = app
                        .reader_article
                        .as_ref()
                        .filter(|a| !a.summary.is_empty())
                        .map(|a| a.summary.clone());
                    app.content_state = ContentState::Failed { error, fallback };
                }
            }
        }
    }
}
