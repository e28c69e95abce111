//! Low-level PDF access: metadata, per-page text and link annotations

use crate::PdfError;
use lopdf::{Dictionary, Document, Object};

/// Document information dictionary entries we use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// A URI link annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLink {
    pub uri: String,
    /// Annotation `/Contents`, or the URI when there is none
    pub text: String,
}

impl PdfLink {
    pub fn to_markdown(&self) -> String {
        format!("[{}]({})", self.text, self.uri)
    }
}

/// Raw material read from a PDF
#[derive(Debug, Clone, Default)]
pub struct LoadedPdf {
    pub metadata: PdfMetadata,
    pub page_count: usize,
    /// Text of each page that could be extracted, in page order
    pub pages: Vec<String>,
    pub links: Vec<PdfLink>,
}

impl LoadedPdf {
    /// All page texts joined with newlines
    pub fn full_text(&self) -> String {
        self.pages.join("\n")
    }
}

/// Reads metadata, page text and link annotations from PDF bytes
///
/// Pages whose text cannot be extracted are skipped with a warning. Only a
/// document that cannot be opened at all, or has no pages, is an error.
pub fn load_pdf(bytes: &[u8]) -> Result<LoadedPdf, PdfError> {
    let document = Document::load_mem(bytes).map_err(|e| PdfError::Open(e.to_string()))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(PdfError::Empty);
    }

    let mut loaded = LoadedPdf {
        metadata: read_metadata(&document),
        page_count: pages.len(),
        ..LoadedPdf::default()
    };

    for (page_number, page_id) in pages {
        match document.extract_text(&[page_number]) {
            Ok(text) => loaded.pages.push(text),
            Err(e) => tracing::warn!("Skipping text of page {}: {}", page_number, e),
        }

        match document.get_dictionary(page_id) {
            Ok(page) => loaded.links.extend(read_links(&document, page)),
            Err(e) => tracing::warn!("Skipping annotations of page {}: {}", page_number, e),
        }
    }

    tracing::debug!(
        "Loaded PDF: {} pages, {} with text, {} links",
        loaded.page_count,
        loaded.pages.len(),
        loaded.links.len()
    );

    Ok(loaded)
}

/// Follows a reference, returning direct objects unchanged
fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(document, object)? {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_entry(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let object = resolve(document, dict.get(key).ok()?)?;
    match object {
        Object::String(bytes, _) => {
            let text = decode_pdf_string(bytes).trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

fn read_metadata(document: &Document) -> PdfMetadata {
    let Some(info) = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| resolve_dict(document, info))
    else {
        return PdfMetadata::default();
    };

    PdfMetadata {
        title: text_entry(document, info, b"Title"),
        author: text_entry(document, info, b"Author"),
    }
}

fn read_links(document: &Document, page: &Dictionary) -> Vec<PdfLink> {
    let Some(annotations) = page
        .get(b"Annots")
        .ok()
        .and_then(|annots| resolve(document, annots))
    else {
        return Vec::new();
    };

    let Object::Array(annotations) = annotations else {
        return Vec::new();
    };

    annotations
        .iter()
        .filter_map(|annotation| resolve_dict(document, annotation))
        .filter(|annotation| {
            matches!(annotation.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Link")
        })
        .filter_map(|annotation| {
            let action = resolve_dict(document, annotation.get(b"A").ok()?)?;
            let uri = text_entry(document, action, b"URI")?;
            let text = text_entry(document, annotation, b"Contents").unwrap_or_else(|| uri.clone());
            Some(PdfLink { uri, text })
        })
        .collect()
}

/// Decodes a PDF text string: UTF-16BE with byte order mark, else Latin-1
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
