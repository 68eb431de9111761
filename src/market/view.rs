use super::RawQuote;

/// Visual trend state for a quote, derived from the sign of the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Arrow glyph shown next to the change.
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Neutral => "–",
        }
    }
}

/// A normalized quote ready for rendering.
///
/// Derivation from the raw wire quote:
/// - previous close = `previousClose`, falling back to `chartPreviousClose`
/// - `change = price − previous close` (needs both)
/// - `percent = change / previous close × 100` — but a previous close of
///   exactly zero yields `None` rather than an infinite/NaN percentage;
///   the panel renders a flagged `n/a` for it
/// - trend follows the sign of the change; no change data means Neutral
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteView {
    pub label: String,
    pub symbol: String,
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub percent: Option<f64>,
    pub trend: Trend,
}

impl QuoteView {
    pub fn from_raw(label: &str, symbol: &str, raw: &RawQuote) -> Self {
        let price = raw.regular_market_price;
        let previous = raw.previous_close.or(raw.chart_previous_close);

        let change = match (price, previous) {
            (Some(q), Some(p)) => Some(q - p),
            _ => None,
        };

        let percent = match (change, previous) {
            (Some(c), Some(p)) if p != 0.0 => Some(c / p * 100.0),
            _ => None,
        };

        let trend = match change {
            Some(c) if c > 0.0 => Trend::Up,
            Some(c) if c < 0.0 => Trend::Down,
            _ => Trend::Neutral,
        };

        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            currency: raw.currency.clone(),
            price,
            change,
            percent,
            trend,
        }
    }

    /// Format the price for display, e.g. `342.55 USD`.
    pub fn format_price(&self) -> String {
        match self.price {
            Some(p) => match &self.currency {
                Some(c) => format!("{p:.2} {c}"),
                None => format!("{p:.2}"),
            },
            None => "—".to_string(),
        }
    }

    /// Format the change and percentage, e.g. `▲ +3.45 (+1.02%)`.
    ///
    /// A missing percentage (previous close zero or absent) renders `n/a`
    /// in its slot.
    pub fn format_delta(&self) -> String {
        match self.change {
            None => format!("{} n/a", self.trend.arrow()),
            Some(c) => match self.percent {
                Some(p) => format!("{} {:+.2} ({:+.2}%)", self.trend.arrow(), c, p),
                None => format!("{} {:+.2} (n/a)", self.trend.arrow(), c),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(price: Option<f64>, prev: Option<f64>, chart_prev: Option<f64>) -> RawQuote {
        RawQuote {
            regular_market_price: price,
            previous_close: prev,
            chart_previous_close: chart_prev,
            ..RawQuote::default()
        }
    }

    #[test]
    fn test_change_and_percent() {
        let view = QuoteView::from_raw("Arabica", "KC=F", &raw(Some(342.55), Some(339.1), None));
        assert_eq!(view.change.unwrap(), 342.55 - 339.1);
        let expected_pct = (342.55 - 339.1) / 339.1 * 100.0;
        assert!((view.percent.unwrap() - expected_pct).abs() < 1e-12);
        assert_eq!(view.trend, Trend::Up);
    }

    #[test]
    fn test_falls_back_to_chart_previous_close() {
        let view = QuoteView::from_raw("Robusta", "RC=F", &raw(Some(4485.0), None, Some(4512.0)));
        assert_eq!(view.change.unwrap(), 4485.0 - 4512.0);
        assert_eq!(view.trend, Trend::Down);
    }

    #[test]
    fn test_prefers_previous_close_over_chart() {
        let view = QuoteView::from_raw("Arabica", "KC=F", &raw(Some(100.0), Some(90.0), Some(80.0)));
        assert_eq!(view.change.unwrap(), 10.0);
    }

    #[test]
    fn test_zero_previous_close_flags_percent() {
        // The one deliberately resolved edge case: no NaN, no infinity
        let view = QuoteView::from_raw("Arabica", "KC=F", &raw(Some(100.0), Some(0.0), None));
        assert_eq!(view.change, Some(100.0));
        assert_eq!(view.percent, None);
        assert_eq!(view.trend, Trend::Up);
        assert!(view.format_delta().contains("n/a"));
    }

    #[test]
    fn test_missing_price_is_neutral() {
        let view = QuoteView::from_raw("Arabica", "KC=F", &raw(None, Some(339.1), None));
        assert_eq!(view.price, None);
        assert_eq!(view.change, None);
        assert_eq!(view.percent, None);
        assert_eq!(view.trend, Trend::Neutral);
        assert_eq!(view.format_price(), "—");
    }

    #[test]
    fn test_unchanged_price_is_neutral() {
        let view = QuoteView::from_raw("Arabica", "KC=F", &raw(Some(339.1), Some(339.1), None));
        assert_eq!(view.change, Some(0.0));
        assert_eq!(view.trend, Trend::Neutral);
    }

    proptest! {
        /// For all P ≠ 0 and Q: change = Q−P and percent = (Q−P)/P×100,
        /// and the trend matches the sign of the change. Ranges cover any
        /// plausible futures price while keeping the arithmetic finite.
        #[test]
        fn prop_change_and_percent_hold(
            p in prop_oneof![0.01f64..1e9, -1e9..-0.01f64],
            q in -1e9f64..1e9,
        ) {
            let view = QuoteView::from_raw("T", "T=F", &raw(Some(q), Some(p), None));
            let change = view.change.unwrap();
            let percent = view.percent.unwrap();

            prop_assert_eq!(change, q - p);
            prop_assert_eq!(percent, (q - p) / p * 100.0);
            prop_assert!(percent.is_finite());

            let expected = if change > 0.0 {
                Trend::Up
            } else if change < 0.0 {
                Trend::Down
            } else {
                Trend::Neutral
            };
            prop_assert_eq!(view.trend, expected);
        }
    }
}
