//! Knowledge-base JSON export
//!
//! Maps extracted [`ContentItem`]s onto the fixed record schema consumed by the
//! knowledge base. Every field is a string and `content_type` is limited to
//! [`SUPPORTED_CONTENT_TYPES`].

use crate::item::ContentItem;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Content types the knowledge base accepts
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &[
    "blog",
    "podcast_transcript",
    "call_transcript",
    "linkedin_post",
    "reddit_comment",
    "book",
    "other",
];

/// Lowercases `content_type` and maps anything unsupported to `other`
pub fn normalize_content_type(content_type: &str) -> &'static str {
    let lowered = content_type.to_lowercase();
    SUPPORTED_CONTENT_TYPES
        .iter()
        .copied()
        .find(|supported| *supported == lowered)
        .unwrap_or("other")
}

/// One exported knowledge item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportItem {
    pub title: String,
    pub content: String,
    pub content_type: String,
    pub source_url: String,
    pub author: String,
    pub user_id: String,
}

impl From<&ContentItem> for ExportItem {
    fn from(item: &ContentItem) -> Self {
        Self {
            title: item.title().to_string(),
            content: item.content().to_string(),
            content_type: normalize_content_type(item.content_type().as_str()).to_string(),
            source_url: item.source_url().to_string(),
            author: item.author().to_string(),
            user_id: String::new(),
        }
    }
}

/// The document handed to the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseExport {
    pub team_id: String,
    pub items: Vec<ExportItem>,
}

impl KnowledgeBaseExport {
    /// Builds an export for `team_id` from extracted items
    ///
    /// # Example
    ///
    /// ```
    /// use kb_harvester::item::{ContentItem, ContentType};
    /// use kb_harvester::output::KnowledgeBaseExport;
    ///
    /// let item = ContentItem::new(
    ///     "Hiring at Acme",
    ///     "# Hiring at Acme\n",
    ///     ContentType::CompanyGuide,
    ///     "https://acme.com/guides/hiring",
    ///     "acme.com",
    /// );
    /// let export = KnowledgeBaseExport::new("team-1", &[item]);
    /// assert_eq!(export.items[0].content_type, "other");
    /// ```
    pub fn new(team_id: impl Into<String>, items: &[ContentItem]) -> Self {
        Self {
            team_id: team_id.into(),
            items: items.iter().map(ExportItem::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the export as pretty JSON to `output_path`, or to stdout when `None`
///
/// # Arguments
///
/// * `export` - The export document
/// * `output_path` - Destination file; stdout when `None`
pub fn write_export(export: &KnowledgeBaseExport, output_path: Option<&Path>) -> Result<()> {
    let mut json = export.to_json_pretty()?;
    json.push('\n');

    match output_path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
            tracing::info!("Wrote {} items to {}", export.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}
