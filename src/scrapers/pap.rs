//! PAP Biznes wire listing (`/kategoria/depesze-pap`).
//!
//! Items are `<li>` elements carrying a `news*` class. The date lives in
//! `div.date`, the headline link and lead in `div.info`. Category and index
//! links share the same markup, so only links into `/wiadomosci/` with a
//! headline of at least [`MIN_TITLE_CHARS`] characters are accepted.

use super::{ItemOutcome, PageContext, SkipReason, SourceExtractor, resolve_link, stripped_text};
use crate::dates::{LISTING_FORMAT, parse_local};
use crate::models::Article;
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Shorter headlines are navigation labels, not articles.
pub const MIN_TITLE_CHARS: usize = 10;
/// Cap on the lead excerpt.
pub const MAX_EXCERPT_CHARS: usize = 200;
/// Path fragment every article link contains.
pub const ARTICLE_PATH: &str = "/wiadomosci/";

static ITEMS: Lazy<Selector> = Lazy::new(|| Selector::parse("li[class]").expect("static selector"));
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.date").expect("static selector"));
static INFO: Lazy<Selector> = Lazy::new(|| Selector::parse("div.info").expect("static selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
static PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p[class]").expect("static selector"));

#[derive(Debug, Clone, Copy)]
pub struct PapExtractor;

impl SourceExtractor for PapExtractor {
    fn name(&self) -> &'static str {
        "pap"
    }

    fn extract(&self, html: &str, ctx: &PageContext<'_>) -> Vec<ItemOutcome> {
        let document = Html::parse_document(html);
        document
            .select(&ITEMS)
            .filter(|li| has_class_containing(*li, "news"))
            .map(|li| extract_item(li, ctx).into())
            .collect()
    }
}

fn extract_item(li: ElementRef<'_>, ctx: &PageContext<'_>) -> Result<Article, SkipReason> {
    // Missing or unreadable dates fall back to the run start.
    let published_at = li
        .select(&DATE)
        .next()
        .and_then(|date| parse_local(&stripped_text(date), LISTING_FORMAT))
        .unwrap_or(ctx.now);

    let info = li.select(&INFO).next().ok_or(SkipReason::MissingContainer)?;
    let anchor = info.select(&LINK).next().ok_or(SkipReason::MissingLink)?;
    let href = anchor.value().attr("href").unwrap_or_default();
    if !href.contains(ARTICLE_PATH) {
        return Err(SkipReason::DisallowedLink);
    }
    let link = resolve_link(ctx.base_url, href)?;

    let title = stripped_text(anchor);
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(SkipReason::ShortTitle);
    }

    let excerpt = info
        .select(&PARAGRAPHS)
        .find(|p| has_class_containing(*p, "field_lead"))
        .map(|p| truncate_chars(&stripped_text(p), MAX_EXCERPT_CHARS))
        .unwrap_or_default();

    Ok(Article {
        title,
        link,
        published_at,
        excerpt,
        source: ctx.source.to_string(),
    })
}

fn has_class_containing(el: ElementRef<'_>, needle: &str) -> bool {
    el.value().classes().any(|c| c.contains(needle))
}
