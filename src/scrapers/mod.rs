//! Listing-page extractors, one per markup shape.
//!
//! Every extractor turns the markup of one listing page into a sequence of
//! per-item outcomes. Extraction is pure: no I/O and no shared state, so a
//! page can be re-parsed any number of times with the same result.
//!
//! # Supported Listings
//!
//! | Tag | Module | Shape |
//! |-----|--------|-------|
//! | `bankier_news` | [`bankier_news`] | Article blocks with `<time>` tags and a lead paragraph |
//! | `bankier_gielda` | [`bankier_gielda`] | Bare links whose text starts with `YYYY-MM-DD HH:MM` |
//! | `pap` | [`pap`] | `li.news` items with separate date, link and lead fields |
//!
//! # Failure Isolation
//!
//! A malformed item yields [`ItemOutcome::Skipped`] with the reason; the rest
//! of the page is still processed.

pub mod bankier_gielda;
pub mod bankier_news;
pub mod pap;

use crate::models::Article;
use crate::utils::{normalize_whitespace, truncate_for_log};
use chrono::DateTime;
use chrono_tz::Tz;
use scraper::ElementRef;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// Everything an extractor may know about the page it is reading.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Base URL that relative links are resolved against.
    pub base_url: &'a Url,
    /// Display name stamped on every article.
    pub source: &'a str,
    /// Run start time; the fallback for items without a usable date.
    pub now: DateTime<Tz>,
}

/// Why an item on a listing page did not become an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    MissingContainer,
    MissingTitle,
    MissingLink,
    BadLink,
    MissingTime,
    BadTime,
    PatternMismatch,
    DisallowedLink,
    ShortTitle,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingContainer => "missing_container",
            SkipReason::MissingTitle => "missing_title",
            SkipReason::MissingLink => "missing_link",
            SkipReason::BadLink => "bad_link",
            SkipReason::MissingTime => "missing_time",
            SkipReason::BadTime => "bad_time",
            SkipReason::PatternMismatch => "pattern_mismatch",
            SkipReason::DisallowedLink => "disallowed_link",
            SkipReason::ShortTitle => "short_title",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of reading one item of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Article(Article),
    Skipped(SkipReason),
}

impl From<Result<Article, SkipReason>> for ItemOutcome {
    fn from(result: Result<Article, SkipReason>) -> Self {
        match result {
            Ok(article) => ItemOutcome::Article(article),
            Err(reason) => ItemOutcome::Skipped(reason),
        }
    }
}

/// A parser for one listing-page markup shape.
pub trait SourceExtractor: Sync {
    /// Config tag of this extractor.
    fn name(&self) -> &'static str;

    /// Read every candidate item on the page.
    fn extract(&self, html: &str, ctx: &PageContext<'_>) -> Vec<ItemOutcome>;
}

/// Config-time binding from an extractor tag to its implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    BankierNews,
    BankierGielda,
    Pap,
}

impl ExtractorKind {
    pub fn extractor(&self) -> &'static dyn SourceExtractor {
        match self {
            ExtractorKind::BankierNews => &bankier_news::BankierNewsExtractor,
            ExtractorKind::BankierGielda => &bankier_gielda::BankierGieldaExtractor,
            ExtractorKind::Pap => &pap::PapExtractor,
        }
    }
}

/// Per-page summary: kept articles plus a tally of skip reasons.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub articles: Vec<Article>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl PageExtraction {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl FromIterator<ItemOutcome> for PageExtraction {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        let mut page = PageExtraction::default();
        for outcome in iter {
            match outcome {
                ItemOutcome::Article(article) => page.articles.push(article),
                ItemOutcome::Skipped(reason) => *page.skipped.entry(reason).or_default() += 1,
            }
        }
        page
    }
}

/// Run `kind` over one page and log what it kept and skipped.
pub fn extract_page(kind: ExtractorKind, html: &str, ctx: &PageContext<'_>) -> PageExtraction {
    let extractor = kind.extractor();
    let page: PageExtraction = extractor.extract(html, ctx).into_iter().collect();
    let skipped = page
        .skipped
        .iter()
        .map(|(reason, n)| format!("{reason}={n}"))
        .collect::<Vec<_>>()
        .join(" ");

    if page.articles.is_empty() && page.skipped_total() > 0 {
        warn!(
            extractor = extractor.name(),
            %skipped,
            preview = %truncate_for_log(html, 200),
            "Page produced no articles"
        );
    } else {
        debug!(
            extractor = extractor.name(),
            kept = page.articles.len(),
            %skipped,
            "Extracted page"
        );
    }
    page
}

/// Text of an element with each fragment trimmed and glued without a
/// separator, then whitespace-normalized.
pub(crate) fn stripped_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().map(str::trim).collect::<String>())
}

/// Text of an element with fragments joined by single spaces.
pub(crate) fn spaced_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Resolve `href` against the page base into an absolute URL string.
pub(crate) fn resolve_link(base: &Url, href: &str) -> Result<String, SkipReason> {
    let href = href.trim();
    if href.is_empty() {
        return Err(SkipReason::MissingLink);
    }
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|_| SkipReason::BadLink)
}
