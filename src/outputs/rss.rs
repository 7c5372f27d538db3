//! RSS 2.0 output for per-source feeds.
//!
//! `lastBuildDate` is the publication time of the newest article and is left
//! out for an empty feed. Items are written in the order given.

use crate::error::FeedError;
use crate::models::{Article, FeedMeta};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render `articles` as an RSS 2.0 document.
pub fn render_rss(meta: &FeedMeta, articles: &[Article]) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    emit(&mut writer, Event::Start(rss))?;
    emit(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &meta.title)?;
    write_text_element(&mut writer, "link", &meta.home_page_url)?;
    write_text_element(&mut writer, "description", meta.description.as_deref().unwrap_or(""))?;
    write_text_element(&mut writer, "language", &meta.language)?;
    if let Some(newest) = articles.iter().map(|a| a.published_at).max() {
        write_text_element(&mut writer, "lastBuildDate", &newest.to_rfc2822())?;
    }

    for article in articles {
        emit(&mut writer, Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &article.title)?;
        write_text_element(&mut writer, "link", &article.link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        emit(&mut writer, Event::Start(guid))?;
        emit(&mut writer, Event::Text(BytesText::new(&article.link)))?;
        emit(&mut writer, Event::End(BytesEnd::new("guid")))?;

        if !article.excerpt.is_empty() {
            write_text_element(&mut writer, "description", &article.excerpt)?;
        }
        write_text_element(&mut writer, "pubDate", &article.published_at.to_rfc2822())?;
        emit(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("channel")))?;
    emit(&mut writer, Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| FeedError::Xml(e.to_string()))
}

/// Render and write an RSS document to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_rss_feed(path: &Path, meta: &FeedMeta, articles: &[Article]) -> Result<(), FeedError> {
    let xml = render_rss(meta, articles)?;
    fs::write(path, xml).await?;
    info!(items = articles.len(), "Wrote RSS feed");
    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), FeedError> {
    writer
        .write_event(event)
        .map_err(|e| FeedError::Xml(e.to_string()))
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), FeedError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}
