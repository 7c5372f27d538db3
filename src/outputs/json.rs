//! JSON Feed output.
//!
//! Renders an article list as a [JSON Feed 1](https://jsonfeed.org/version/1)
//! document. Items keep the order they were given in; the per-item `source`
//! field is only written for the combined feed.
//!
//! # Output Shape
//!
//! ```text
//! {
//!   "version": "https://jsonfeed.org/version/1",
//!   "title": "...",
//!   "description": "...",
//!   "home_page_url": "https://www.bankier.pl",
//!   "items": [
//!     { "id": link, "url": link, "title": ..., "content_html": excerpt,
//!       "date_published": "2024-03-01T09:15:00+01:00", "source": "Bankier.pl" }
//!   ]
//! }
//! ```

use crate::error::FeedError;
use crate::models::{Article, FeedMeta};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";

/// Top-level JSON Feed document.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonFeed {
    pub version: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub home_page_url: String,
    pub items: Vec<JsonFeedItem>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonFeedItem {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content_html: String,
    pub date_published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl JsonFeed {
    /// Build a feed from `articles`, tagging items with their source when
    /// `with_source` is set.
    pub fn new(meta: &FeedMeta, articles: &[Article], with_source: bool) -> Self {
        Self {
            version: JSON_FEED_VERSION.to_string(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            home_page_url: meta.home_page_url.clone(),
            items: articles
                .iter()
                .map(|a| JsonFeedItem {
                    id: a.link.clone(),
                    url: a.link.clone(),
                    title: a.title.clone(),
                    content_html: a.excerpt.clone(),
                    date_published: a.published_at.to_rfc3339_opts(SecondsFormat::AutoSi, false),
                    source: with_source.then(|| a.source.clone()),
                })
                .collect(),
        }
    }

    /// Pretty JSON with two-space indentation and unescaped non-ASCII text.
    pub fn render(&self) -> Result<String, FeedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render and write a JSON feed to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json_feed(
    path: &Path,
    meta: &FeedMeta,
    articles: &[Article],
    with_source: bool,
) -> Result<(), FeedError> {
    let json = JsonFeed::new(meta, articles, with_source).render()?;
    fs::write(path, json).await?;
    info!(items = articles.len(), "Wrote JSON feed");
    Ok(())
}
