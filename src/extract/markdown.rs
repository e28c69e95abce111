//! HTML to markdown conversion
//!
//! Walks the structural elements of a document in order and renders each one
//! as a markdown block. Text is whitespace-collapsed everywhere except inside
//! code blocks.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements rendered as markdown blocks
const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, pre, ul, ol, blockquote, figure";

/// Subtrees that never contribute content
const IGNORED_CONTAINERS: &[&str] = &["nav", "footer", "script", "style", "noscript"];

/// Blocks that render their whole subtree; nested blocks are not visited again
const RENDERING_CONTAINERS: &[&str] = &["pre", "ul", "ol", "li", "blockquote", "figure"];

/// A fenced code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language from a `language-*`/`lang-*` class, possibly empty
    pub language: String,
    /// Code text, verbatim
    pub content: String,
}

impl CodeBlock {
    /// Reads a `<pre>` element, preferring its inner `<code>`
    pub fn from_pre(pre: ElementRef) -> Self {
        let code = Selector::parse("code")
            .ok()
            .and_then(|selector| pre.select(&selector).next());

        match code {
            Some(code) => Self {
                language: code_language(code),
                content: code.text().collect(),
            },
            None => Self {
                language: String::new(),
                content: pre.text().collect(),
            },
        }
    }

    pub fn to_markdown(&self) -> String {
        let content = self.content.trim_end_matches('\n');
        format!("```{}\n{}\n```", self.language, content)
    }
}

/// Collapses runs of whitespace into single spaces and trims
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Language named by the first `language-*` or `lang-*` class token
fn code_language(code: ElementRef) -> String {
    code.value()
        .classes()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .unwrap_or_default()
        .to_string()
}

fn has_ancestor(element: &ElementRef, names: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| names.contains(&ancestor.value().name()))
}

/// Converts a parsed document to markdown
///
/// # Rendering Rules
///
/// | Element | Markdown |
/// |---------|----------|
/// | `h1`..`h6` | `#` repeated by level |
/// | `p` | paragraph followed by a blank line |
/// | `pre` | fenced block, language from the `<code>` class |
/// | `ul` / `ol` | `* item` / `1. item`, nested lists indented |
/// | `blockquote` | `> text`, then any code blocks it holds |
/// | `figure` | `![alt](src)` for its image |
///
/// Content under `nav`, `footer`, `script`, `style` and `noscript` is
/// ignored. Blocks nested in a list, `pre`, `blockquote` or `figure` are
/// rendered by that container; a `pre` inside a list item or quote still
/// becomes its own fenced block.
pub fn to_markdown(document: &Html) -> String {
    let Ok(selector) = Selector::parse(BLOCK_SELECTOR) else {
        return String::new();
    };

    let mut blocks: Vec<String> = Vec::new();

    for element in document.select(&selector) {
        if has_ancestor(&element, IGNORED_CONTAINERS) || has_ancestor(&element, RENDERING_CONTAINERS) {
            continue;
        }

        let block = match element.value().name() {
            name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => heading(element, name),
            "p" => non_empty(clean_text(&element.text().collect::<String>())),
            "pre" => Some(CodeBlock::from_pre(element).to_markdown()),
            "ul" | "ol" => list(element),
            "blockquote" => blockquote(element),
            "figure" => figure(element),
            _ => None,
        };

        if let Some(block) = block {
            blocks.push(block);
        }
    }

    let mut markdown = blocks.join("\n\n");
    if !markdown.is_empty() {
        markdown.push('\n');
    }
    markdown
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn heading(element: ElementRef, name: &str) -> Option<String> {
    let level: usize = name[1..].parse().ok()?;
    let text = non_empty(clean_text(&element.text().collect::<String>()))?;
    Some(format!("{} {}", "#".repeat(level), text))
}

/// Renders a list and every list nested inside it
fn list(element: ElementRef) -> Option<String> {
    let mut lines = Vec::new();
    render_list(element, 0, &mut lines);
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn render_list(list: ElementRef, indent: usize, lines: &mut Vec<String>) {
    let prefix = if list.value().name() == "ol" { "1. " } else { "* " };

    for item in list.children().filter_map(ElementRef::wrap) {
        if item.value().name() != "li" {
            continue;
        }

        let text = clean_text(&text_outside(item, &["ul", "ol", "pre"]));
        if !text.is_empty() {
            lines.push(format!("{}{}{}", "  ".repeat(indent), prefix, text));
        }

        for nested in item.descendants().filter_map(ElementRef::wrap) {
            let owner = nested
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "li")
                .map(|li| li.id());
            if owner != Some(item.id()) {
                continue;
            }
            match nested.value().name() {
                "ul" | "ol" => render_list(nested, indent + 1, lines),
                "pre" => lines.push(CodeBlock::from_pre(nested).to_markdown()),
                _ => {}
            }
        }
    }
}

/// Text under `root`, leaving out anything inside an element named in `skipped`
fn text_outside(root: ElementRef, skipped: &[&str]) -> String {
    let mut text = String::new();
    for node in root.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let inside_skipped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(ElementRef::wrap)
            .any(|ancestor| skipped.contains(&ancestor.value().name()));
        if !inside_skipped {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

/// Quoted text, followed by any code blocks the quote contains
fn blockquote(element: ElementRef) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(text) = non_empty(clean_text(&text_outside(element, &["pre"]))) {
        parts.push(format!("> {}", text));
    }

    let pre = Selector::parse("pre").ok()?;
    parts.extend(element.select(&pre).map(|code| CodeBlock::from_pre(code).to_markdown()));

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn figure(element: ElementRef) -> Option<String> {
    let selector = Selector::parse("img[src]").ok()?;
    let img = element.select(&selector).next()?;
    let src = img.value().attr("src")?;
    let alt = img.value().attr("alt").unwrap_or_default();
    Some(format!("![{}]({})", clean_text(alt), src))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(html: &str) -> String {
        to_markdown(&Html::parse_document(html))
    }

    #[test]
    fn test_heading_paragraph_and_code() {
        let md = convert(
            r#"<h1>Title</h1><p>Hello</p><pre><code class="language-python">x=1</code></pre>"#,
        );
        assert!(md.contains("# Title"));
        assert!(md.lines().any(|line| line == "Hello"));
        assert!(md.contains("```python\nx=1\n```"));
    }

    #[test]
    fn test_heading_levels() {
        let md = convert("<h2>Two</h2><h4>  Four \n here </h4>");
        assert_eq!(md, "## Two\n\n#### Four here\n");
    }

    #[test]
    fn test_code_is_verbatim() {
        let md = convert("<pre><code class=\"hljs lang-rust\">fn main() {\n    let  x = 1;\n}\n</code></pre>");
        assert!(md.contains("```rust\nfn main() {\n    let  x = 1;\n}\n```"));
    }

    #[test]
    fn test_code_language_keeps_full_suffix() {
        let md = convert(r#"<pre><code class="language-objective-c">x</code></pre>"#);
        assert!(md.starts_with("```objective-c\n"));
    }

    #[test]
    fn test_code_without_language() {
        let md = convert("<pre><code>ls -la</code></pre>");
        assert_eq!(md, "```\nls -la\n```\n");
    }

    #[test]
    fn test_lists() {
        let md = convert("<ul><li>one</li><li>two <b>bold</b></li></ul><ol><li>a</li><li>b</li></ol>");
        assert_eq!(md, "* one\n* two bold\n\n1. a\n1. b\n");
    }

    #[test]
    fn test_nested_list_rendered_once() {
        let md = convert("<ul><li>outer<ul><li>inner</li></ul></li><li>last</li></ul>");
        assert_eq!(md, "* outer\n  * inner\n* last\n");
    }

    #[test]
    fn test_paragraph_inside_list_item_not_duplicated() {
        let md = convert("<ul><li><p>only once</p></li></ul>");
        assert_eq!(md.matches("only once").count(), 1);
    }

    #[test]
    fn test_ignores_navigation_and_scripts() {
        let md = convert(
            "<nav><p>Home</p><ul><li>Menu</li></ul></nav><p>Body</p><footer><p>Copyright</p></footer>",
        );
        assert_eq!(md, "Body\n");
    }

    #[test]
    fn test_blockquote_and_figure() {
        let md = convert(
            r#"<blockquote><p>Ship it</p></blockquote><figure><img src="/a.png" alt="Diagram"></figure>"#,
        );
        assert_eq!(md, "> Ship it\n\n![Diagram](/a.png)\n");
    }

    #[test]
    fn test_code_inside_list_item_keeps_fence() {
        let md = convert(
            "<ol><li>Run this:<pre><code class=\"language-python\">def f():\n    return 1</code></pre></li><li>Done</li></ol>",
        );
        assert_eq!(md, "1. Run this:\n```python\ndef f():\n    return 1\n```\n1. Done\n");
    }

    #[test]
    fn test_code_in_nested_list_rendered_once() {
        let md = convert("<ul><li>outer<ul><li>inner<pre><code>x  = 1</code></pre></li></ul></li></ul>");
        assert_eq!(md, "* outer\n  * inner\n```\nx  = 1\n```\n");
    }

    #[test]
    fn test_code_inside_blockquote_keeps_fence() {
        let md = convert("<blockquote><pre><code>a\n  b</code></pre></blockquote>");
        assert_eq!(md, "```\na\n  b\n```\n");

        let md = convert("<blockquote><p>Try:</p><pre><code class=\"lang-sh\">ls  -la</code></pre></blockquote>");
        assert_eq!(md, "> Try:\n\n```sh\nls  -la\n```\n");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let md = convert("<p>  lots\n\n  of   space </p><p>   </p>");
        assert_eq!(md, "lots of space\n");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  a \t b\n c "), "a b c");
        assert_eq!(clean_text(""), "");
    }
}
