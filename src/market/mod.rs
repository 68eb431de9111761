//! Live commodity quotes.
//!
//! Quotes come from the Yahoo Finance v8 chart API — the `meta` node of a
//! one-day chart response carries the regular market price and previous
//! close. [`fetch_quote`] goes through the offline gateway (which classifies
//! finance requests as network-only, so quotes are never served stale), and
//! [`QuoteView`] derives the change, percentage and trend shown on the
//! market panel.

mod quote;
mod view;
mod wire;

pub use quote::{chart_url, fetch_quote, QuoteError};
pub use view::{QuoteView, Trend};
pub use wire::RawQuote;
