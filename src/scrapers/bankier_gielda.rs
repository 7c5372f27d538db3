//! Bankier.pl stock-exchange news listing (`/gielda/wiadomosci/`).
//!
//! This listing has no structured article blocks. Every article is a plain
//! link whose visible text reads `YYYY-MM-DD HH:MM  Title`; any link whose
//! text does not follow that shape is navigation and gets skipped.

use super::{ItemOutcome, PageContext, SkipReason, SourceExtractor, resolve_link, spaced_text};
use crate::dates::{LISTING_FORMAT, parse_local};
use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").expect("static selector"));
static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
static DATED_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2})\s+(.+)$").expect("static regex")
});

#[derive(Debug, Clone, Copy)]
pub struct BankierGieldaExtractor;

impl SourceExtractor for BankierGieldaExtractor {
    fn name(&self) -> &'static str {
        "bankier_gielda"
    }

    fn extract(&self, html: &str, ctx: &PageContext<'_>) -> Vec<ItemOutcome> {
        let document = Html::parse_document(html);
        let scope = document
            .select(&MAIN)
            .next()
            .unwrap_or_else(|| document.root_element());
        scope
            .select(&LINKS)
            .map(|anchor| extract_link(anchor, ctx).into())
            .collect()
    }
}

fn extract_link(anchor: ElementRef<'_>, ctx: &PageContext<'_>) -> Result<Article, SkipReason> {
    let text = spaced_text(anchor);
    let caps = DATED_TITLE
        .captures(&text)
        .ok_or(SkipReason::PatternMismatch)?;
    let published_at = parse_local(&caps[1], LISTING_FORMAT).ok_or(SkipReason::BadTime)?;
    let title = caps[2].to_string();

    let href = anchor.value().attr("href").ok_or(SkipReason::MissingLink)?;
    let link = resolve_link(ctx.base_url, href)?;

    Ok(Article {
        title,
        link,
        published_at,
        excerpt: String::new(),
        source: ctx.source.to_string(),
    })
}
