//! Chapter segmentation and document classification over extracted PDF text

use crate::item::ContentType;
use regex::Regex;
use std::sync::OnceLock;

/// Title used for text that does not belong to a detected chapter
pub const DOCUMENT_CONTENT: &str = "Document Content";

/// A contiguous run of text between two structural headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub raw_content: String,
}

fn chapter_header() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:Chapter|CHAPTER|Section|SECTION)\s+(\d+)[.:)]?\s*(.*)$").ok())
        .as_ref()
}

fn numbered_header() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+(.+)$").ok()).as_ref()
}

/// Returns the chapter title if `line` is a structural header
///
/// `Chapter 3: Storage` yields `Storage`, `2. Replication` yields
/// `Replication`. A bare `Chapter 3` yields the whole line.
pub fn header_title(line: &str) -> Option<String> {
    let line = line.trim();

    if let Some(captures) = chapter_header().and_then(|re| re.captures(line)) {
        let title = captures.get(2).map_or("", |m| m.as_str()).trim();
        return Some(if title.is_empty() {
            line.to_string()
        } else {
            title.to_string()
        });
    }

    numbered_header()
        .and_then(|re| re.captures(line))
        .and_then(|captures| captures.get(1))
        .map(|title| title.as_str().trim().to_string())
}

/// Text being accumulated for the chapter that is currently open
#[derive(Default)]
struct OpenChapter {
    /// `(title, header line)`; `None` for text before the first header
    header: Option<(String, String)>,
    /// Lines carried over from short sections before this header
    carried: Vec<String>,
    lines: Vec<String>,
}

impl OpenChapter {
    fn body_len(&self) -> usize {
        self.carried
            .iter()
            .chain(&self.lines)
            .map(|line| line.trim().chars().count())
            .sum()
    }

    fn body(&self) -> String {
        let lines: Vec<&str> = self
            .carried
            .iter()
            .chain(&self.lines)
            .map(String::as_str)
            .collect();
        lines.join("\n").trim_matches('\n').to_string()
    }
}

/// Splits document text into chapters
///
/// # Segmentation Rules
///
/// - A header closes the open chapter only if that chapter's body (the
///   characters of its non-blank lines) exceeds `min_length`
/// - A short headed chapter is folded, header line included, into the
///   previous chapter; if there is none it is carried into the next one
/// - A short preamble is carried into the first chapter; a long one becomes
///   a chapter titled "Document Content"
/// - If no chapter forms at all, the whole text is one "Document Content"
///   chapter
pub fn segment_chapters(text: &str, min_length: usize) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut open = OpenChapter::default();

    for line in text.lines() {
        match header_title(line) {
            Some(title) => {
                let carried = close_chapter(&mut chapters, open, min_length);
                open = OpenChapter {
                    header: Some((title, line.trim().to_string())),
                    carried,
                    lines: Vec::new(),
                };
            }
            None => open.lines.push(line.to_string()),
        }
    }

    close_chapter(&mut chapters, open, min_length);

    if chapters.is_empty() {
        return vec![Chapter {
            title: DOCUMENT_CONTENT.to_string(),
            raw_content: text.trim().to_string(),
        }];
    }

    chapters
}

/// Closes `open`, returning lines that must be carried into the next chapter
fn close_chapter(chapters: &mut Vec<Chapter>, open: OpenChapter, min_length: usize) -> Vec<String> {
    let long_enough = open.body_len() > min_length;

    if long_enough {
        let title = match &open.header {
            Some((title, _)) => title.clone(),
            None => DOCUMENT_CONTENT.to_string(),
        };
        chapters.push(Chapter {
            title,
            raw_content: open.body(),
        });
        return Vec::new();
    }

    let OpenChapter {
        header,
        carried,
        lines,
    } = open;

    let Some((title, header_line)) = header else {
        return lines;
    };

    let mut section = carried;
    section.push(header_line);
    section.extend(lines);

    match chapters.last_mut() {
        Some(previous) => {
            tracing::trace!("Folding short section '{}' into '{}'", title, previous.title);
            let folded = section.join("\n");
            previous.raw_content.push('\n');
            previous.raw_content.push_str(folded.trim_end_matches('\n'));
            Vec::new()
        }
        None => section,
    }
}

/// Guesses the kind of document from keywords in its text
pub fn classify_text(text: &str) -> ContentType {
    if text.contains("Education") && text.contains("Skills") {
        ContentType::Resume
    } else if text.contains("Chapter") || text.contains("CHAPTER") {
        ContentType::Book
    } else if text.contains("Abstract") && text.contains("References") {
        ContentType::Paper
    } else {
        ContentType::Other
    }
}
