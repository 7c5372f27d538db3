//! Bankier.pl news listing (`/wiadomosc/`).
//!
//! The listing is a `section#articleList` holding `div.article` blocks. Each
//! block has a headline link, one or more `time.entry-date` tags (the last one
//! is the most recent edit) and an optional lead paragraph ending in a
//! "read more" link that is not part of the excerpt.

use super::{ItemOutcome, PageContext, SkipReason, SourceExtractor, resolve_link, stripped_text};
use crate::dates::parse_iso;
use crate::models::Article;
use crate::utils::normalize_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ARTICLE_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section#articleList > div.article").expect("static selector"));
static CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.entry-content").expect("static selector"));
static TITLE_SPAN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.entry-title").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static META: Lazy<Selector> = Lazy::new(|| Selector::parse("div.entry-meta").expect("static selector"));
static ENTRY_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time.entry-date").expect("static selector"));
static LEAD: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

#[derive(Debug, Clone, Copy)]
pub struct BankierNewsExtractor;

impl SourceExtractor for BankierNewsExtractor {
    fn name(&self) -> &'static str {
        "bankier_news"
    }

    fn extract(&self, html: &str, ctx: &PageContext<'_>) -> Vec<ItemOutcome> {
        let document = Html::parse_document(html);
        document
            .select(&ARTICLE_BLOCKS)
            .map(|block| extract_block(block, ctx).into())
            .collect()
    }
}

fn extract_block(block: ElementRef<'_>, ctx: &PageContext<'_>) -> Result<Article, SkipReason> {
    let content = block.select(&CONTENT).next().ok_or(SkipReason::MissingContainer)?;

    // Only the first title span counts, even if a later one holds a link.
    let anchor = content
        .select(&TITLE_SPAN)
        .next()
        .and_then(|span| span.select(&ANCHOR).next())
        .ok_or(SkipReason::MissingTitle)?;
    let href = anchor.value().attr("href").ok_or(SkipReason::MissingLink)?;
    let title = stripped_text(anchor);
    if title.is_empty() {
        return Err(SkipReason::MissingTitle);
    }
    let link = resolve_link(ctx.base_url, href)?;

    let meta = content.select(&META).next().ok_or(SkipReason::MissingTime)?;
    let time_tag = meta.select(&ENTRY_DATE).last().ok_or(SkipReason::MissingTime)?;
    let raw_time = match time_tag.value().attr("datetime") {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => stripped_text(time_tag),
    };
    let published_at = parse_iso(&raw_time).ok_or(SkipReason::BadTime)?;

    let excerpt = content.select(&LEAD).next().map(lead_text).unwrap_or_default();

    Ok(Article {
        title,
        link,
        published_at,
        excerpt,
        source: ctx.source.to_string(),
    })
}

/// Lead paragraph text without anything inside `a.more-link`.
fn lead_text(p: ElementRef<'_>) -> String {
    let fragments = p
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != p.id())
                .filter_map(ElementRef::wrap)
                .any(is_more_link)
        })
        .map(|(_, text)| &**text)
        .collect::<Vec<&str>>();

    normalize_whitespace(&fragments.join(" "))
}

fn is_more_link(el: ElementRef<'_>) -> bool {
    el.value().name() == "a" && el.value().classes().any(|c| c == "more-link")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_support::{BANKIER, ctx};

    fn block(title_html: &str, meta_html: &str, lead_html: &str) -> String {
        format!(
            r#"<div class="article">
                 <div class="entry-content">
                   <span class="entry-title">{title_html}</span>
                   <div class="entry-meta">{meta_html}</div>
                   {lead_html}
                 </div>
               </div>"#
        )
    }

    fn page(blocks: &[String]) -> String {
        format!(
            r#"<html><body><section id="articleList">{}</section></body></html>"#,
            blocks.join("\n")
        )
    }

    fn run(html: &str) -> Vec<ItemOutcome> {
        BankierNewsExtractor.extract(html, &ctx(&BANKIER, "Bankier.pl"))
    }

    #[test]
    fn test_full_block() {
        let html = page(&[block(
            r#"<a href="/wiadomosc/Stopy-procentowe-bez-zmian-8712345.html">
                 Stopy procentowe
                 bez zmian
               </a>"#,
            r#"<time class="entry-date" datetime="2024-03-01T08:00:00+01:00">01.03 08:00</time>
               <time class="entry-date" datetime="2024-03-01T09:30:00+01:00">01.03 09:30</time>"#,
            r#"<p>RPP pozostawiła stopy
                 na niezmienionym poziomie. <a class="more-link" href="/x">Czytaj dalej</a></p>"#,
        )]);

        let outcomes = run(&html);
        assert_eq!(outcomes.len(), 1);
        let ItemOutcome::Article(article) = &outcomes[0] else {
            panic!("expected article, got {:?}", outcomes[0]);
        };
        assert_eq!(article.title, "Stopy procentowe bez zmian");
        assert_eq!(
            article.link,
            "https://www.bankier.pl/wiadomosc/Stopy-procentowe-bez-zmian-8712345.html"
        );
        assert_eq!(article.published_at.to_rfc3339(), "2024-03-01T09:30:00+01:00");
        assert_eq!(article.excerpt, "RPP pozostawiła stopy na niezmienionym poziomie.");
        assert_eq!(article.source, "Bankier.pl");
    }

    #[test]
    fn test_time_text_used_without_datetime_attribute() {
        let html = page(&[block(
            r#"<a href="/wiadomosc/a.html">Inflacja w lutym spadła</a>"#,
            r#"<time class="entry-date">2024-03-01 10:05</time>"#,
            "",
        )]);
        let outcomes = run(&html);
        let ItemOutcome::Article(article) = &outcomes[0] else {
            panic!("expected article");
        };
        assert_eq!(article.published_at.to_rfc3339(), "2024-03-01T10:05:00+01:00");
        assert_eq!(article.excerpt, "");
    }

    #[test]
    fn test_malformed_blocks_are_skipped_individually() {
        let html = page(&[
            // no title span
            block("", r#"<time class="entry-date" datetime="2024-03-01T10:00:00">x</time>"#, ""),
            // no time
            block(r#"<a href="/wiadomosc/b.html">Bez daty</a>"#, "", ""),
            // unparseable time
            block(
                r#"<a href="/wiadomosc/c.html">Zła data</a>"#,
                r#"<time class="entry-date">wczoraj</time>"#,
                "",
            ),
            // good one
            block(
                r#"<a href="/wiadomosc/d.html">Dobry wpis</a>"#,
                r#"<time class="entry-date" datetime="2024-03-01T11:00:00">x</time>"#,
                "<p>Lead</p>",
            ),
        ]);

        let outcomes = run(&html);
        assert_eq!(
            outcomes[..3],
            [
                ItemOutcome::Skipped(SkipReason::MissingTitle),
                ItemOutcome::Skipped(SkipReason::MissingTime),
                ItemOutcome::Skipped(SkipReason::BadTime),
            ]
        );
        let ItemOutcome::Article(article) = &outcomes[3] else {
            panic!("expected article");
        };
        assert_eq!(article.link, "https://www.bankier.pl/wiadomosc/d.html");
        assert_eq!(article.excerpt, "Lead");
    }

    #[test]
    fn test_title_comes_from_first_title_span_only() {
        let time = r#"<time class="entry-date" datetime="2024-03-01T10:00:00">x</time>"#;
        let html = page(&[
            block(
                r#"<a href="/wiadomosc/pierwszy.html">Pierwszy tytuł</a></span>
                   <span class="entry-title"><a href="/wiadomosc/drugi.html">Drugi tytuł</a>"#,
                time,
                "",
            ),
            block(
                r#"Bez linku</span>
                   <span class="entry-title"><a href="/wiadomosc/ukryty.html">Ukryty tytuł</a>"#,
                time,
                "",
            ),
        ]);

        let outcomes = run(&html);
        assert_eq!(outcomes.len(), 2);
        let ItemOutcome::Article(article) = &outcomes[0] else {
            panic!("expected article, got {:?}", outcomes[0]);
        };
        assert_eq!(article.title, "Pierwszy tytuł");
        assert_eq!(article.link, "https://www.bankier.pl/wiadomosc/pierwszy.html");
        assert_eq!(outcomes[1], ItemOutcome::Skipped(SkipReason::MissingTitle));
    }

    #[test]
    fn test_space_separated_offset_datetime_is_kept() {
        let html = page(&[block(
            r#"<a href="/wiadomosc/e.html">Kurs euro rośnie</a>"#,
            r#"<time class="entry-date" datetime="2024-03-01 09:15+01:00">09:15</time>"#,
            "",
        )]);
        let outcomes = run(&html);
        let ItemOutcome::Article(article) = &outcomes[0] else {
            panic!("expected article, got {:?}", outcomes[0]);
        };
        assert_eq!(article.published_at.to_rfc3339(), "2024-03-01T09:15:00+01:00");
    }

    #[test]
    fn test_nested_article_divs_are_ignored() {
        let html = r#"<section id="articleList">
              <div class="wrapper"><div class="article">
                <div class="entry-content"><span class="entry-title"><a href="/n">Zagnieżdżony</a></span></div>
              </div></div>
            </section>"#;
        assert!(run(html).is_empty());
    }

    #[test]
    fn test_missing_section_yields_nothing() {
        assert!(run("<html><body><div class='article'></div></body></html>").is_empty());
    }
}
