use super::markdown::clean_text;
use crate::url::registrable_domain;
use scraper::{Html, Selector};
use url::Url;

/// Meta tags consulted for the author, in priority order
const AUTHOR_META_SELECTORS: &[&str] = &[
    r#"meta[name="author"]"#,
    r#"meta[property="article:author"]"#,
    r#"meta[property="og:author"]"#,
];

/// Elements that commonly carry a byline
const AUTHOR_ELEMENT_SELECTOR: &str = r#"a[rel="author"], span.author, div.author"#;

/// Page title: first `<h1>`, then `<title>`, then "Untitled"
pub fn extract_title(document: &Html) -> String {
    first_text(document, "h1")
        .or_else(|| first_text(document, "title"))
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Page author: meta tags, then byline elements, then the site's domain
pub fn extract_author(document: &Html, url: &Url) -> String {
    for selector in AUTHOR_META_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        let content = document
            .select(&selector)
            .filter_map(|meta| meta.value().attr("content"))
            .map(clean_text)
            .find(|content| !content.is_empty());
        if let Some(content) = content {
            return content;
        }
    }

    if let Some(byline) = first_text(document, AUTHOR_ELEMENT_SELECTOR) {
        return byline;
    }

    registrable_domain(url).unwrap_or_default()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|element| clean_text(&element.text().collect::<String>()))
        .find(|text| !text.is_empty())
}
