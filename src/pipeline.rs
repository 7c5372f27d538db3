//! Paging, per-source aggregation and cross-source merging.
//!
//! The pipeline runs strictly in sequence: every listing of a source is walked
//! page by page through a [`PageFetcher`], each page goes through its bound
//! extractor, and the candidates are then deduplicated, window-filtered and
//! ordered newest first.
//!
//! # Ordering
//!
//! Sorting is stable, so articles with equal timestamps keep encounter order
//! (listing order, then page order, then position on the page). The merged
//! output is therefore a pure function of the candidate sequence.

use crate::config::{ListingEntry, SourceConfig};
use crate::error::ConfigError;
use crate::fetch::PageFetcher;
use crate::models::Article;
use crate::scrapers::{PageContext, extract_page};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Walk every listing of `source` and return the aggregated article list.
///
/// Failed pages contribute nothing; only an unusable base URL is an error.
#[instrument(level = "info", skip_all, fields(source = %source.key))]
pub async fn collect_source<F: PageFetcher>(
    fetcher: &F,
    source: &SourceConfig,
    now: DateTime<Tz>,
    retention: Duration,
) -> Result<Vec<Article>, ConfigError> {
    let base_url = source.base()?;
    let ctx = PageContext {
        base_url: &base_url,
        source: &source.name,
        now,
    };

    let mut candidates = Vec::new();
    for listing in &source.listings {
        candidates.extend(collect_listing(fetcher, listing, &ctx).await);
    }

    let articles = aggregate(candidates, now - retention);
    info!(source = %source.key, kept = articles.len(), "Collected articles (deduplicated)");
    Ok(articles)
}

/// Fetch exactly `listing.pages` pages and extract each one.
async fn collect_listing<F: PageFetcher>(
    fetcher: &F,
    listing: &ListingEntry,
    ctx: &PageContext<'_>,
) -> Vec<Article> {
    let pages: Vec<Vec<Article>> = stream::iter(listing.page_urls())
        .then(|url| async move {
            match fetcher.fetch(&url).await {
                Ok(html) => extract_page(listing.extractor, &html, ctx).articles,
                Err(e) => {
                    warn!(%url, kind = e.kind(), error = %e, "Skipping page");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    pages.into_iter().flatten().collect()
}

/// Deduplicate by link, drop articles older than `cutoff`, sort newest first.
///
/// An article published exactly at `cutoff` is kept. Only kept articles mark
/// their link as seen, so a stale copy never shadows a fresh one; among fresh
/// copies the first encountered wins.
pub fn aggregate(candidates: Vec<Article>, cutoff: DateTime<Tz>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Article> = candidates
        .into_iter()
        .filter(|article| article.published_at >= cutoff)
        .filter(|article| seen.insert(article.link.clone()))
        .collect();
    sort_newest_first(&mut kept);
    kept
}

/// Merge per-source lists into one feed.
///
/// Sources are concatenated in the given order, the first occurrence of each
/// link wins, and the result is re-sorted newest first. No window filtering
/// happens here.
pub fn merge_sources(per_source: Vec<Vec<Article>>) -> Vec<Article> {
    let mut merged: Vec<Article> = per_source
        .into_iter()
        .flatten()
        .unique_by(|article| article.link.clone())
        .collect();
    sort_newest_first(&mut merged);
    info!(count = merged.len(), "Merged unique articles from all sources");
    merged
}

fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
