//! kb-harvester: technical knowledge extraction
//!
//! This crate discovers articles on rendered web pages, converts them into
//! markdown knowledge items, and segments PDF documents into chapter-like
//! items. The browser engine is only reached through the [`render`] traits,
//! so crawling and extraction can run against any DOM provider.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod item;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kb-harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Browser session error: {0}")]
    Resource(#[from] ResourceError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("Could not scrape any content from {url}")]
    NoContent { url: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Failure to obtain a rendered page for one URL.
///
/// Always recoverable: the crawler skips the URL, the extractor turns it into
/// an error-flagged item.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Timed out loading {url}")]
    Timeout { url: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Content selector '{selector}' never appeared on {url}")]
    NotReady { url: String, selector: String },

    #[error("HTTP {status} error for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// The URL this failure belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Navigation { url, .. }
            | Self::NotReady { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Network { url, .. } => url,
        }
    }
}

/// Browser session could not be started or stopped
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to start browser session: {0}")]
    Launch(String),

    #[error("Failed to close browser session: {0}")]
    Shutdown(String),
}

/// PDF-level failures (the document as a whole could not be read)
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("Failed to read PDF at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("PDF contains no pages")]
    Empty,
}

/// Result type alias for kb-harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, FrontierCrawler, LinkExtractor};
pub use extract::PageExtractor;
pub use item::{ContentItem, ContentType};
pub use output::KnowledgeBaseExport;
pub use pdf::PdfStructuralParser;
pub use pipeline::{Harvester, UrlMode};
pub use crate::url::{normalize_url, registrable_domain};
