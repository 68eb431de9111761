//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values so render code never
//! hardcodes colors. `ThemeVariant` selects between the Dark and Light
//! palettes; the variant can be set from config and cycled at runtime.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Market panel --
    pub quote_label: Style,
    pub quote_price: Style,
    pub quote_up: Style,
    pub quote_down: Style,
    pub quote_neutral: Style,
    pub quote_failed: Style,

    // -- Headline list --
    pub headline: Style,
    pub headline_selected: Style,
    pub headline_category: Style,
    pub headline_source: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_emphasis: Style,
    pub reader_link: Style,

    // -- Chrome --
    pub panel_border: Style,
    pub panel_title: Style,
    pub status_bar: Style,
    pub status_error: Style,
    pub demo_badge: Style,
    pub updated_at: Style,
}

impl ColorPalette {
    /// The default palette, tuned for dark terminals.
    pub fn dark() -> Self {
        Self {
            quote_label: Style::default().fg(Color::Gray),
            quote_price: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            quote_up: Style::default().fg(Color::Green),
            quote_down: Style::default().fg(Color::Red),
            quote_neutral: Style::default().fg(Color::DarkGray),
            quote_failed: Style::default().fg(Color::DarkGray),

            headline: Style::default().fg(Color::White),
            headline_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            headline_category: Style::default().fg(Color::Yellow),
            headline_source: Style::default().fg(Color::DarkGray),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::White),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            panel_border: Style::default().fg(Color::DarkGray),
            panel_title: Style::default().fg(Color::Cyan),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::Red),
            demo_badge: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            updated_at: Style::default().fg(Color::DarkGray),
        }
    }

    /// Palette for light terminals.
    pub fn light() -> Self {
        Self {
            quote_label: Style::default().fg(Color::DarkGray),
            quote_price: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            quote_up: Style::default().fg(Color::Green),
            quote_down: Style::default().fg(Color::Red),
            quote_neutral: Style::default().fg(Color::Gray),
            quote_failed: Style::default().fg(Color::Gray),

            headline: Style::default().fg(Color::Black),
            headline_selected: Style::default().bg(Color::Gray).fg(Color::Black),
            headline_category: Style::default().fg(Color::Magenta),
            headline_source: Style::default().fg(Color::Gray),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            panel_border: Style::default().fg(Color::Gray),
            panel_title: Style::default().fg(Color::Blue),
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            status_error: Style::default().bg(Color::Gray).fg(Color::Red),
            demo_badge: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            updated_at: Style::default().fg(Color::Gray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("LIGHT"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("solarized"), None);
    }

    #[test]
    fn test_variant_cycle_round_trips() {
        let v = ThemeVariant::Dark;
        assert_eq!(v.next().next(), v);
    }

    #[test]
    fn test_palettes_distinguish_trend_roles() {
        for palette in [ColorPalette::dark(), ColorPalette::light()] {
            assert_ne!(palette.quote_up, palette.quote_down);
            assert_ne!(palette.quote_up, palette.quote_neutral);
        }
    }
}
