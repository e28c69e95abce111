//! Heuristic markdown for plain PDF text
//!
//! PDF text carries no structure, so headings and code are guessed from the
//! shape of each line. Code detection is best-effort.

use super::document::PdfLink;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn chapter_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:Chapter|CHAPTER|Section|SECTION)\s+\d+").ok())
        .as_ref()
}

fn numbered_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+").ok()).as_ref()
}

fn code_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\s{4,}\w+|[\[\]{}()\w]+\s*[=:])").ok())
        .as_ref()
}

fn is_match(re: Option<&Regex>, text: &str) -> bool {
    re.is_some_and(|re| re.is_match(text))
}

/// Link annotations worth listing for a chapter
///
/// Links whose text or URI already appear in the chapter are skipped, as are
/// duplicates.
fn missing_links<'a>(content: &str, links: &'a [PdfLink]) -> Vec<&'a PdfLink> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| !link.uri.is_empty() && !link.text.is_empty())
        .filter(|link| !content.contains(&link.text) && !content.contains(&link.uri))
        .filter(|link| seen.insert((link.text.as_str(), link.uri.as_str())))
        .collect()
}

/// Converts chapter text to markdown
///
/// # Line Rules
///
/// | Line | Markdown |
/// |------|----------|
/// | `Chapter N ...` / `Section N ...` | `# line` |
/// | `N. ...` | `## line` |
/// | indented 4+ spaces, or `name =`/`name:` | inside a ``` fence |
/// | anything else | unchanged |
///
/// A fence opens on the first code-like line and closes at a blank line, a
/// non-code line, or the end of the chapter. Links from the page annotations
/// that the text does not already mention are listed first.
pub fn text_to_markdown(content: &str, links: &[PdfLink]) -> String {
    let mut out: Vec<String> = Vec::new();

    let missing = missing_links(content, links);
    if !missing.is_empty() {
        out.extend(missing.iter().map(|link| link.to_markdown()));
        out.push(String::new());
    }

    let mut in_code = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if is_match(chapter_line(), trimmed) || is_match(numbered_line(), trimmed) {
            if in_code {
                out.push("```".to_string());
                in_code = false;
            }
            let marker = if is_match(chapter_line(), trimmed) { "#" } else { "##" };
            out.push(String::new());
            out.push(format!("{} {}", marker, trimmed));
            out.push(String::new());
        } else if is_match(code_line(), line) {
            if !in_code {
                out.push("```".to_string());
                in_code = true;
            }
            out.push(line.to_string());
        } else {
            if in_code {
                out.push("```".to_string());
                in_code = false;
            }
            out.push(line.to_string());
        }
    }

    if in_code {
        out.push("```".to_string());
    }

    collapse_blank_lines(&out.join("\n"))
}

/// Squeezes runs of blank lines into one and drops leading/trailing newlines
fn collapse_blank_lines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }

    result.trim_matches('\n').to_string()
}
