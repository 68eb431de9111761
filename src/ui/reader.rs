//! The article reader view: relay markdown rendered as styled lines.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;

use crate::app::{App, ContentState};
use crate::theme::ColorPalette;
use crate::util::strip_control_chars;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.reader_article.clone() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    let palette = app.palette.clone();

    // Header: title, then source line, then a blank separator
    let mut header = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            palette.reader_heading,
        )),
        Line::from(Span::styled(
            format!(
                "{}{}",
                article.source.as_deref().unwrap_or("unknown source"),
                if article.category.is_empty() {
                    String::new()
                } else {
                    format!(" • {}", article.category)
                }
            ),
            palette.headline_source,
        )),
        Line::from(""),
    ];

    // Measure content before borrowing it for render, so the scroll clamp
    // (a mutation) happens first — a resize never draws with a stale offset.
    let (content_len, from_cache) = match &app.content_state {
        ContentState::Idle | ContentState::Loading => (1, false),
        ContentState::Loaded {
            rendered_lines,
            from_cache,
        } => (rendered_lines.len(), *from_cache),
        ContentState::Failed { fallback, .. } => (
            2 + fallback
                .as_ref()
                .map(|s| 2 + s.lines().count())
                .unwrap_or(0),
            false,
        ),
    };

    if from_cache {
        header.insert(
            2,
            Line::from(Span::styled("offline copy", palette.demo_badge)),
        );
    }

    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.clamp_reader_scroll(header.len() + content_len);

    let content_lines: Cow<'_, [Line<'static>]> = match &app.content_state {
        ContentState::Idle => Cow::Owned(vec![Line::from("Press Enter to load content…")]),
        ContentState::Loading => Cow::Owned(vec![Line::from("Loading content…")]),
        ContentState::Loaded { rendered_lines, .. } => Cow::Borrowed(rendered_lines.as_slice()),
        ContentState::Failed { error, fallback } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Failed to load content: {error}"),
                    palette.status_error,
                )),
                Line::from(""),
            ];
            if let Some(summary) = fallback {
                lines.push(Line::from(Span::styled(
                    "Showing summary:",
                    palette.headline_source,
                )));
                lines.push(Line::from(""));
                lines.extend(
                    summary
                        .lines()
                        .map(|l| Line::from(strip_control_chars(l).into_owned())),
                );
            }
            Cow::Owned(lines)
        }
    };

    let text = Text::from_iter(header.into_iter().chain(content_lines.iter().cloned()));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border)
                .title(Span::styled("Reader", palette.panel_title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

/// Render relay markdown into styled lines.
///
/// Headings, emphasis, inline code and list bullets get distinct styles;
/// link destinations are appended dimly after the link text. Control
/// characters are stripped — the content is remote text.
pub(super) fn render_markdown(markdown: &str, palette: &ColorPalette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut style_stack: Vec<Style> = vec![palette.reader_body];
    let mut link_dest: Option<String> = None;

    let mut flush = |current: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !current.is_empty() {
            lines.push(Line::from(std::mem::take(current)));
        }
    };

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut current, &mut lines);
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                let style = match level {
                    HeadingLevel::H1 | HeadingLevel::H2 => palette.reader_heading,
                    _ => palette.reader_emphasis.patch(palette.reader_heading),
                };
                style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                flush(&mut current, &mut lines);
                lines.push(Line::from(""));
            }

            Event::Start(Tag::Paragraph) => flush(&mut current, &mut lines),
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current, &mut lines);
                lines.push(Line::from(""));
            }

            Event::Start(Tag::Emphasis) | Event::Start(Tag::Strong) => {
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.patch(palette.reader_emphasis));
            }
            Event::End(TagEnd::Emphasis) | Event::End(TagEnd::Strong) => {
                style_stack.pop();
            }

            Event::Start(Tag::Link { dest_url, .. }) => {
                link_dest = Some(dest_url.to_string());
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.patch(palette.reader_link));
            }
            Event::End(TagEnd::Link) => {
                style_stack.pop();
                if let Some(dest) = link_dest.take() {
                    current.push(Span::styled(
                        format!(" ({dest})"),
                        palette.headline_source,
                    ));
                }
            }

            Event::Start(Tag::Item) => {
                flush(&mut current, &mut lines);
                current.push(Span::styled("  • ", palette.reader_body));
            }
            Event::End(TagEnd::Item) => flush(&mut current, &mut lines),
            Event::End(TagEnd::List(_)) => lines.push(Line::from("")),

            Event::Text(text) | Event::Code(text) => {
                let style = *style_stack.last().unwrap_or(&Style::default());
                current.push(Span::styled(
                    strip_control_chars(&text).into_owned(),
                    style,
                ));
            }

            Event::SoftBreak => current.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current, &mut lines),
            Event::Rule => {
                flush(&mut current, &mut lines);
                lines.push(Line::from(Span::styled("────", palette.panel_border)));
            }

            _ => {}
        }
    }
    flush(&mut current, &mut lines);

    if lines.is_empty() {
        lines.push(Line::from("(no content)"));
    }
    lines
}
