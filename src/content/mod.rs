//! Article content for the reader view.
//!
//! Headlines link to full articles on the open web; a readability relay
//! turns those pages into markdown the terminal can render. Content
//! requests go through the offline gateway with network-first policy, so
//! an article read once stays readable with the network gone.

mod readability;

pub use readability::{fetch_article, resolve_reader_key, ArticleContent, ContentError};
