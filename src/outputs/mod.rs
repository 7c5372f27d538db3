//! Output generation for JSON Feed and RSS documents.
//!
//! # Submodules
//!
//! - [`json`]: JSON Feed documents, used by both run modes
//! - [`rss`]: RSS 2.0 documents, per-source mode only
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── combined-feed.json   # combined mode
//! ├── bankier.xml          # per-source mode
//! ├── bankier.json
//! ├── pap.xml
//! └── pap.json
//! ```

pub mod json;
pub mod rss;

use crate::config::{Settings, SourceConfig};
use crate::error::FeedError;
use crate::models::{Article, FeedMeta};
use std::path::Path;
use tracing::{error, instrument};

/// Metadata of the combined feed spanning `sources`.
pub fn combined_meta(sources: &[&SourceConfig], settings: &Settings) -> FeedMeta {
    let names = sources.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    FeedMeta {
        title: format!("Wiadomości Finansowe - {}", names.join(" + ")),
        description: Some(format!(
            "Połączone wiadomości z wielu źródeł (ostatnie {}h)",
            settings.hours_back
        )),
        home_page_url: sources
            .first()
            .map(|s| s.base_url.clone())
            .unwrap_or_default(),
        language: settings.language.clone(),
    }
}

/// Metadata of a single source's feeds.
pub fn source_meta(source: &SourceConfig, settings: &Settings) -> FeedMeta {
    FeedMeta {
        title: source.name.clone(),
        description: Some(format!(
            "{} - najnowsze wiadomości (ostatnie {}h)",
            source.name, settings.hours_back
        )),
        home_page_url: source.base_url.clone(),
        language: settings.language.clone(),
    }
}

/// Write the combined JSON feed into `output_dir`.
#[instrument(level = "info", skip_all)]
pub async fn write_combined(
    output_dir: &Path,
    sources: &[&SourceConfig],
    settings: &Settings,
    articles: &[Article],
) -> Result<(), FeedError> {
    let meta = combined_meta(sources, settings);
    let path = output_dir.join(&settings.combined_file);
    json::write_json_feed(&path, &meta, articles, true).await
}

/// Write the RSS and JSON feeds of one source.
///
/// Both files are attempted even if the first one fails; the first error is
/// returned.
#[instrument(level = "info", skip_all, fields(source = %source.key))]
pub async fn write_source(
    output_dir: &Path,
    source: &SourceConfig,
    settings: &Settings,
    articles: &[Article],
) -> Result<(), FeedError> {
    let meta = source_meta(source, settings);

    let rss_path = output_dir.join(&source.rss_file);
    let rss_result = rss::write_rss_feed(&rss_path, &meta, articles).await;
    if let Err(e) = &rss_result {
        error!(path = %rss_path.display(), error = %e, "Failed to write RSS feed");
    }

    let json_path = output_dir.join(&source.json_file);
    let json_result = json::write_json_feed(&json_path, &meta, articles, false).await;
    if let Err(e) = &json_result {
        error!(path = %json_path.display(), error = %e, "Failed to write JSON feed");
    }

    rss_result.and(json_result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::outputs::json::JsonFeed;

    #[test]
    fn test_combined_meta() {
        let config = AppConfig::default();
        let sources = config.select("all").unwrap();
        let meta = combined_meta(&sources, &config.settings);
        assert_eq!(meta.title, "Wiadomości Finansowe - Bankier.pl + PAP Biznes");
        assert_eq!(
            meta.description.as_deref(),
            Some("Połączone wiadomości z wielu źródeł (ostatnie 24h)")
        );
        assert_eq!(meta.home_page_url, "https://www.bankier.pl");
    }

    #[test]
    fn test_source_meta() {
        let config = AppConfig::default();
        let meta = source_meta(&config.sources[1], &config.settings);
        assert_eq!(meta.title, "PAP Biznes");
        assert_eq!(meta.home_page_url, "https://biznes.pap.pl");
        assert_eq!(meta.language, "pl");
    }

    #[tokio::test]
    async fn test_write_combined_empty_feed_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        let sources = config.select("all").unwrap();
        write_combined(dir.path(), &sources, &config.settings, &[]).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("combined-feed.json")).unwrap();
        let feed: JsonFeed = serde_json::from_str(&raw).unwrap();
        assert!(feed.items.is_empty());
        assert_eq!(feed.version, json::JSON_FEED_VERSION);
    }

    #[tokio::test]
    async fn test_write_source_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        write_source(dir.path(), &config.sources[0], &config.settings, &[])
            .await
            .unwrap();
        assert!(dir.path().join("bankier.xml").is_file());
        assert!(dir.path().join("bankier.json").is_file());
    }

    #[tokio::test]
    async fn test_write_source_attempts_json_after_rss_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        let mut source = config.sources[1].clone();
        source.rss_file = "missing/pap.xml".to_string();

        let result = write_source(dir.path(), &source, &config.settings, &[]).await;
        assert!(matches!(result, Err(FeedError::Io(_))));
        assert!(dir.path().join("pap.json").is_file());
    }
}
