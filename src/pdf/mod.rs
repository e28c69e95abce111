//! PDF structural parsing
//!
//! Reads a PDF, segments its text into chapters and renders each chapter as
//! markdown. Parsing is CPU-bound and needs no browser, so callers on an async
//! runtime should run it on a blocking thread.
//!
//! # Example
//!
//! ```no_run
//! use kb_harvester::config::PdfConfig;
//! use kb_harvester::pdf::{PdfSource, PdfStructuralParser};
//!
//! let parser = PdfStructuralParser::new(&PdfConfig::default());
//! let parsed = parser.parse(&PdfSource::path("designing-data-systems.pdf")).unwrap();
//! for chapter in parsed.chapters() {
//!     println!("{}", chapter.title);
//! }
//! let items = parsed.into_items(false);
//! ```

mod chapters;
mod document;
mod markdown;

pub use chapters::{classify_text, header_title, segment_chapters, Chapter, DOCUMENT_CONTENT};
pub use document::{decode_pdf_string, load_pdf, LoadedPdf, PdfLink, PdfMetadata};
pub use markdown::text_to_markdown;

#[cfg(test)]
pub(crate) use document::tests::sample_pdf;

use crate::config::PdfConfig;
use crate::item::{ContentItem, ContentType};
use crate::PdfError;
use std::path::{Path, PathBuf};

/// Title used when nothing better is known
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";

/// Where PDF bytes come from
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// A file on disk
    Path(PathBuf),
    /// An in-memory buffer; `name` is reported as the source (a URL or file name)
    Bytes { data: Vec<u8>, name: String },
}

impl PdfSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn bytes(data: Vec<u8>, name: impl Into<String>) -> Self {
        Self::Bytes {
            data,
            name: name.into(),
        }
    }

    /// Human-readable origin, used as the items' source URL
    pub fn source(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    /// Last path component, used as a title fallback
    fn file_name(&self) -> Option<String> {
        let name = match self {
            Self::Path(path) => path.file_name()?.to_string_lossy().into_owned(),
            Self::Bytes { name, .. } => name
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    fn read(&self) -> Result<Vec<u8>, PdfError> {
        match self {
            Self::Path(path) => read_file(path),
            Self::Bytes { data, .. } => Ok(data.clone()),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, PdfError> {
    std::fs::read(path).map_err(|source| PdfError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Result of parsing one PDF
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    title: String,
    author: String,
    content_type: ContentType,
    source: String,
    chapters: Vec<Chapter>,
    links: Vec<PdfLink>,
}

impl ParsedPdf {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Chapters in document order
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Markdown for one chapter, including links it does not mention
    pub fn chapter_markdown(&self, chapter: &Chapter) -> String {
        text_to_markdown(&chapter.raw_content, &self.links)
    }

    /// All chapters as one markdown document, each under its own heading
    pub fn merged_markdown(&self) -> String {
        self.chapters
            .iter()
            .map(|chapter| format!("# {}\n\n{}", chapter.title, self.chapter_markdown(chapter)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Converts the parse result into knowledge items
    ///
    /// With `split_chapters` every chapter becomes an item titled
    /// `<document> - <chapter>`; otherwise a single merged item is produced.
    pub fn into_items(self, split_chapters: bool) -> Vec<ContentItem> {
        if !split_chapters {
            return vec![ContentItem::new(
                self.title.as_str(),
                self.merged_markdown(),
                self.content_type,
                self.source.as_str(),
                self.author.as_str(),
            )];
        }

        self.chapters
            .iter()
            .map(|chapter| {
                ContentItem::new(
                    format!("{} - {}", self.title, chapter.title),
                    self.chapter_markdown(chapter),
                    self.content_type,
                    self.source.as_str(),
                    self.author.as_str(),
                )
            })
            .collect()
    }
}

/// Segments PDF documents into chapter-like knowledge items
#[derive(Debug, Clone)]
pub struct PdfStructuralParser {
    min_chapter_length: usize,
    default_author: String,
    split_chapters: bool,
}

impl PdfStructuralParser {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            min_chapter_length: config.min_chapter_length,
            default_author: config.default_author.clone(),
            split_chapters: config.split_chapters,
        }
    }

    /// Overrides the configured split mode
    pub fn with_split_chapters(mut self, split_chapters: bool) -> Self {
        self.split_chapters = split_chapters;
        self
    }

    /// Parses a PDF into metadata and chapters
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] only when the document as a whole cannot be read.
    /// Unreadable pages are skipped.
    pub fn parse(&self, source: &PdfSource) -> Result<ParsedPdf, PdfError> {
        tracing::info!("Parsing PDF: {}", source.source());

        let bytes = source.read()?;
        let loaded = load_pdf(&bytes)?;
        let parsed = self.build(loaded, source.file_name(), source.source());

        tracing::info!(
            "Parsed '{}' ({}): {} chapters",
            parsed.title,
            parsed.content_type,
            parsed.chapters.len()
        );

        Ok(parsed)
    }

    /// Parses a PDF straight into items, honouring the configured split mode
    pub fn parse_items(&self, source: &PdfSource) -> Result<Vec<ContentItem>, PdfError> {
        Ok(self.parse(source)?.into_items(self.split_chapters))
    }

    fn build(&self, loaded: LoadedPdf, file_name: Option<String>, source: String) -> ParsedPdf {
        let full_text = loaded.full_text();

        let content_type = classify_text(&full_text);
        let chapters = segment_chapters(&full_text, self.min_chapter_length);

        let mut title = loaded
            .metadata
            .title
            .clone()
            .or_else(|| first_meaningful_line(loaded.pages.first().map(String::as_str)))
            .or(file_name)
            .unwrap_or_else(|| UNTITLED_DOCUMENT.to_string());

        if title == UNTITLED_DOCUMENT {
            if let Some(first) = chapters.first().filter(|c| c.title != DOCUMENT_CONTENT) {
                title = first.title.clone();
            }
        }

        let author = loaded
            .metadata
            .author
            .clone()
            .unwrap_or_else(|| self.default_author.clone());

        ParsedPdf {
            title,
            author,
            content_type,
            source,
            chapters,
            links: loaded.links,
        }
    }
}

impl Default for PdfStructuralParser {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}

/// First line of the page longer than five characters
fn first_meaningful_line(page: Option<&str>) -> Option<String> {
    page?
        .lines()
        .map(str::trim)
        .find(|line| line.chars().count() > 5)
        .map(str::to_string)
}
