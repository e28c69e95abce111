//! Knowledge items produced by page extraction and PDF parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of an extracted item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Blog,
    CompanyGuide,
    Book,
    Resume,
    Paper,
    Other,
    Error,
}

impl ContentType {
    /// The wire name of this content type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::CompanyGuide => "company_guide",
            Self::Book => "book",
            Self::Resume => "resume",
            Self::Paper => "paper",
            Self::Other => "other",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blog" => Ok(Self::Blog),
            "company_guide" => Ok(Self::CompanyGuide),
            "book" => Ok(Self::Book),
            "resume" => Ok(Self::Resume),
            "paper" => Ok(Self::Paper),
            "other" => Ok(Self::Other),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown content type '{}'", other)),
        }
    }
}

/// A single extracted knowledge item.
///
/// Either a successful extraction (markdown content, non-error type) or an
/// error item (diagnostic content, every other field empty). The two states
/// are only reachable through [`ContentItem::new`] and [`ContentItem::error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    title: String,
    content: String,
    content_type: ContentType,
    source_url: String,
    author: String,
}

impl ContentItem {
    /// Builds a successfully extracted item.
    ///
    /// Passing [`ContentType::Error`] is a caller bug; it is downgraded to
    /// [`ContentType::Other`] so the success/error states stay disjoint.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        content_type: ContentType,
        source_url: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let content_type = match content_type {
            ContentType::Error => ContentType::Other,
            other => other,
        };

        Self {
            title: title.into(),
            content: content.into(),
            content_type,
            source_url: source_url.into(),
            author: author.into(),
        }
    }

    /// Builds an error item carrying a human-readable diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            content: message.into(),
            content_type: ContentType::Error,
            source_url: String::new(),
            author: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns true if this item is an extraction failure
    pub fn is_error(&self) -> bool {
        self.content_type == ContentType::Error
    }
}
