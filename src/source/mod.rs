//! News document resolution.
//!
//! The dashboard's data comes from a single `news.json` document that may
//! live at any of several candidate locations (a local file next to the
//! binary, a sibling `public/` directory, a remote URL). This module models
//! those candidates as explicit [`SourceDescriptor`]s tried in order via a
//! generic first-success combinator, and falls back to built-in demo
//! content when every candidate fails.

mod demo;
mod descriptor;
mod document;
mod fetch;

pub use demo::demo_document;
pub use descriptor::{first_success, Location, SourceDescriptor};
pub use document::{Article, MarketData, NewsDocument};
pub use fetch::{load_document, resolve, DocumentOrigin, Resolved, SourceError};
