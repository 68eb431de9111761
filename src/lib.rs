//! `drip` — a terminal dashboard for coffee futures prices and industry news.
//!
//! The crate is organised around three cooperating parts:
//!
//! - [`source`] resolves the `news.json` document from an ordered list of
//!   candidate locations, falling back to built-in demo content.
//! - [`market`] fetches and normalizes live commodity quotes from the
//!   Yahoo Finance chart API.
//! - [`cache`] is the offline gateway every article-content request goes
//!   through: network-first with cache fallback for readable content,
//!   network-only for JSON/API requests.
//!
//! The [`digest`] module is the headless exporter that produces `news.json`
//! in the first place (RSS aggregation plus a market snapshot), and [`ui`]
//! renders everything with ratatui.

pub mod app;
pub mod cache;
pub mod config;
pub mod content;
pub mod digest;
pub mod market;
pub mod source;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
