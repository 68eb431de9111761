//! The one-line status bar: transient messages, refresh state, key hints.

use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

use crate::app::{App, View};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Cow keeps the static hint strings allocation-free
    let text: Cow<'_, str> = if app.refreshing {
        Cow::Borrowed("Refreshing…")
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else if app.is_demo() {
        Cow::Borrowed("DEMO MODE — [r]etry fetch  [q]uit")
    } else {
        match app.view {
            View::Dashboard => {
                Cow::Borrowed("[r]efresh [j/k]move [Enter]read [o]pen [t]heme [q]uit")
            }
            View::Reader => Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [o]pen [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
