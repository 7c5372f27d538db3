//! Data models shared by the extractors, the aggregation pipeline and the
//! feed writers.
//!
//! - [`Article`]: one listing entry, built by an extractor and never mutated
//! - [`FeedMeta`]: channel-level metadata for a rendered feed

use chrono::DateTime;
use chrono_tz::Tz;

/// A single article discovered on a listing page.
///
/// `link` is absolute and acts as the identity key: two articles with the same
/// link are the same article, within one source and across sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Whitespace-normalized, non-empty headline.
    pub title: String,
    /// Absolute URL resolved against the source's base URL.
    pub link: String,
    /// Publication time in the civil zone.
    pub published_at: DateTime<Tz>,
    /// Lead text, possibly empty.
    pub excerpt: String,
    /// Display name of the originating site.
    pub source: String,
}

/// Channel-level metadata written alongside the items of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    pub description: Option<String>,
    pub home_page_url: String,
    /// BCP 47 tag written into the RSS channel.
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{LISTING_FORMAT, parse_local};

    #[test]
    fn test_article_equality_includes_all_fields() {
        let a = Article {
            title: "Spółka X podała wyniki".to_string(),
            link: "https://www.bankier.pl/wiadomosc/x".to_string(),
            published_at: parse_local("2024-03-01 09:15", LISTING_FORMAT).unwrap(),
            excerpt: String::new(),
            source: "Bankier.pl".to_string(),
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.excerpt = "Lead".to_string();
        assert_ne!(a, b);
    }
}
