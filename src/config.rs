//! Source table and runtime settings.
//!
//! The built-in table describes every site the aggregator knows about. An
//! optional YAML file can replace the `settings` block, the `sources` list, or
//! both; whatever it omits keeps the built-in value. The resulting
//! [`AppConfig`] is read-only for the rest of the run.
//!
//! ```yaml
//! settings:
//!   request_delay_ms: 1000
//!   hours_back: 12
//! sources:
//!   - key: pap
//!     name: PAP Biznes
//!     base_url: https://biznes.pap.pl
//!     rss_file: pap.xml
//!     json_file: pap.json
//!     listings:
//!       - url: https://biznes.pap.pl/kategoria/depesze-pap
//!         pages: 3
//!         extractor: pap
//!         pagination: { style: query_param, param: page }
//! ```

use crate::error::ConfigError;
use crate::scrapers::ExtractorKind;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Keyword accepted by `--source` to select every configured source.
pub const ALL_SOURCES: &str = "all";

/// Upper bound for `hours_back`, ten years.
pub const MAX_HOURS_BACK: i64 = 24 * 365 * 10;

/// Fetch pacing, retention and output naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause after every request, successful or not.
    pub request_delay_ms: u64,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Retention window: older articles are dropped.
    pub hours_back: i64,
    /// File name of the combined JSON feed.
    pub combined_file: String,
    /// Language tag written into RSS channels.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_delay_ms: 2500,
            request_timeout_secs: 15,
            hours_back: 24,
            combined_file: "combined-feed.json".to_string(),
            language: "pl".to_string(),
        }
    }
}

impl Settings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retention window, clamped to `1..=MAX_HOURS_BACK` hours.
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::hours(self.hours_back.clamp(1, MAX_HOURS_BACK))
    }
}

/// How pages 2..N of a listing are addressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum Pagination {
    /// `{url}{page}`, e.g. `/wiadomosc/2`.
    #[default]
    PathSuffix,
    /// `{url}?{param}={page}`.
    QueryParam { param: String },
}

/// One paginated listing of a source and the extractor that reads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingEntry {
    pub url: String,
    pub pages: u32,
    pub extractor: ExtractorKind,
    #[serde(default)]
    pub pagination: Pagination,
}

impl ListingEntry {
    /// URL of the given 1-based page. Page 1 is the template itself.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            return self.url.clone();
        }
        match &self.pagination {
            Pagination::PathSuffix => format!("{}{}", self.url, page),
            Pagination::QueryParam { param } => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}{}={}", self.url, sep, param, page)
            }
        }
    }

    /// Every page URL in fetch order, exactly `pages` of them.
    pub fn page_urls(&self) -> Vec<String> {
        (1..=self.pages).map(|page| self.page_url(page)).collect()
    }
}

/// Static description of one news site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub key: String,
    pub name: String,
    pub base_url: String,
    pub rss_file: String,
    pub json_file: String,
    pub listings: Vec<ListingEntry>,
}

impl SourceConfig {
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

/// Complete configuration handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub settings: Settings,
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            sources: builtin_sources(),
        }
    }
}

impl AppConfig {
    /// Built-in configuration, optionally overridden by a YAML file.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                let config = Self::from_yaml(&raw)?;
                info!(path = %path.display(), sources = config.sources.len(), "Loaded config file");
                config
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HOURS_BACK).contains(&self.settings.hours_back) {
            return Err(ConfigError::InvalidRetention(self.settings.hours_back));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for source in &self.sources {
            source.base()?;
        }
        Ok(())
    }

    /// Sources picked by `--source`, in declaration order.
    pub fn select(&self, selection: &str) -> Result<Vec<&SourceConfig>, ConfigError> {
        if selection == ALL_SOURCES {
            return Ok(self.sources.iter().collect());
        }
        self.sources
            .iter()
            .find(|s| s.key == selection)
            .map(|s| vec![s])
            .ok_or_else(|| ConfigError::UnknownSource(selection.to_string()))
    }
}

fn builtin_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            key: "bankier".to_string(),
            name: "Bankier.pl".to_string(),
            base_url: "https://www.bankier.pl".to_string(),
            rss_file: "bankier.xml".to_string(),
            json_file: "bankier.json".to_string(),
            listings: vec![
                ListingEntry {
                    url: "https://www.bankier.pl/wiadomosc/".to_string(),
                    pages: 5,
                    extractor: ExtractorKind::BankierNews,
                    pagination: Pagination::PathSuffix,
                },
                ListingEntry {
                    url: "https://www.bankier.pl/gielda/wiadomosci/".to_string(),
                    pages: 5,
                    extractor: ExtractorKind::BankierGielda,
                    pagination: Pagination::PathSuffix,
                },
            ],
        },
        SourceConfig {
            key: "pap".to_string(),
            name: "PAP Biznes".to_string(),
            base_url: "https://biznes.pap.pl".to_string(),
            rss_file: "pap.xml".to_string(),
            json_file: "pap.json".to_string(),
            listings: vec![ListingEntry {
                url: "https://biznes.pap.pl/kategoria/depesze-pap".to_string(),
                pages: 10,
                extractor: ExtractorKind::Pap,
                pagination: Pagination::QueryParam {
                    param: "page".to_string(),
                },
            }],
        },
    ]
}
