//! Error types for fetching, configuration and feed output.
//!
//! Only [`ConfigError`] and [`FeedError`] ever reach the operator. A
//! [`FetchError`] is always absorbed by the paginator, which treats the page
//! as empty and moves on.

use thiserror::Error;

/// Failure of a single listing-page request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page URL could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The origin answered with a non-2xx status.
    #[error("http status {0}")]
    Status(u16),

    /// Connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be read or decoded.
    #[error("failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    /// Short machine-friendly label used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Timeout => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Transport(_) => "transport",
            FetchError::Body(_) => "body",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        if err.is_body() || err.is_decode() {
            return FetchError::Body(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

/// Failure to render or write one output document.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml serialization failed: {0}")]
    Xml(String),
}

/// Problems with the source table or the source selection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown source '{0}'")]
    UnknownSource(String),

    #[error("source '{key}' has an invalid base url: {reason}")]
    InvalidBaseUrl { key: String, reason: String },

    #[error("no sources configured")]
    NoSources,

    #[error("hours_back must be between 1 and {max}, got {0}", max = crate::config::MAX_HOURS_BACK)]
    InvalidRetention(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(FetchError::Timeout.kind(), "timeout");
        assert_eq!(FetchError::Status(503).kind(), "status");
        assert_eq!(FetchError::Status(503).to_string(), "http status 503");
    }

    #[test]
    fn test_invalid_retention_message() {
        assert_eq!(
            ConfigError::InvalidRetention(-6).to_string(),
            "hours_back must be between 1 and 87600, got -6"
        );
    }

    #[test]
    fn test_unknown_source_message() {
        let err = ConfigError::UnknownSource("reuters".to_string());
        assert_eq!(err.to_string(), "unknown source 'reuters'");
    }
}
