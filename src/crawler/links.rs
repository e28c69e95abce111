//! Link extraction for the frontier crawler
//!
//! Turns the anchors of a rendered page into absolute, normalized,
//! same-site URLs that the crawler may enqueue.

use crate::url::{matches_content_pattern, normalize_parsed, registrable_domain, same_site, site_key};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts same-site links from rendered pages
///
/// The extractor is bound to the registrable domain of the crawl seed. Links
/// on other hosts, including other subdomains, are dropped.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base_url: Url,
    base_domain: String,
    patterns: Option<Vec<String>>,
}

impl LinkExtractor {
    /// Creates an extractor for the site of `base_url`
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.clone(),
            base_domain: registrable_domain(base_url).unwrap_or_default(),
            patterns: None,
        }
    }

    /// Only return links whose path matches one of `patterns`
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = Some(patterns);
        self
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Extracts links from a rendered page
    ///
    /// # Link Rules
    ///
    /// **Skipped:**
    /// - empty and fragment-only hrefs
    /// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
    /// - anything that is not http(s) after resolution
    /// - hosts outside the base domain, or on another explicit port
    /// - links back to `current_url` itself
    ///
    /// Relative hrefs are resolved against `current_url` and every result is
    /// normalized, so `#section` variants of a page collapse into one URL.
    /// The `www.` and bare-host forms of a page count as one link; the first
    /// form seen is returned.
    ///
    /// # Returns
    ///
    /// Unique URLs in document order
    ///
    /// # Example
    ///
    /// ```
    /// use kb_harvester::LinkExtractor;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://site.com/").unwrap();
    /// let html = r#"<a href="/blog/post-1">Post</a><a href="https://other.com/x">Elsewhere</a>"#;
    /// let links = LinkExtractor::new(&base).extract(&base, html);
    /// assert_eq!(links.len(), 1);
    /// assert_eq!(links[0].as_str(), "https://site.com/blog/post-1");
    /// ```
    pub fn extract(&self, current_url: &Url, html: &str) -> Vec<Url> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let current = normalize_parsed(current_url.clone())
            .ok()
            .and_then(|url| site_key(&url));
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = self.resolve(href, current_url) else {
                continue;
            };

            let key = site_key(&url).unwrap_or_else(|| url.to_string());
            if current.as_ref() == Some(&key) {
                continue;
            }

            if let Some(patterns) = &self.patterns {
                if !matches_content_pattern(&url, patterns) {
                    continue;
                }
            }

            if seen.insert(key) {
                links.push(url);
            }
        }

        tracing::trace!("Extracted {} links from {}", links.len(), current_url);
        links
    }

    fn resolve(&self, href: &str, current_url: &Url) -> Option<Url> {
        let href = href.trim();

        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let lowered = href.to_ascii_lowercase();
        if ["javascript:", "mailto:", "tel:", "data:"]
            .iter()
            .any(|scheme| lowered.starts_with(scheme))
        {
            return None;
        }

        let absolute = current_url.join(href).ok()?;
        let normalized = normalize_parsed(absolute).ok()?;

        if same_site(&self.base_url, &normalized) {
            Some(normalized)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://site.com/").unwrap()
    }

    fn extract(html: &str) -> Vec<String> {
        LinkExtractor::new(&base())
            .extract(&base(), html)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_only_same_site_article_survives() {
        let html = r##"
            <a href="#">Top</a>
            <a href="javascript:void(0)">Menu</a>
            <a href="mailto:x@y.com">Mail</a>
            <a href="/blog/post-1">Post</a>
            <a href="https://other.com/x">Other</a>
        "##;
        assert_eq!(extract(html), vec!["https://site.com/blog/post-1"]);
    }

    #[test]
    fn test_fragments_collapse() {
        let html = r##"
            <a href="/page#a">A</a>
            <a href="/page#b">B</a>
            <a href="/page">Plain</a>
        "##;
        assert_eq!(extract(html), vec!["https://site.com/page"]);
    }

    #[test]
    fn test_resolves_relative_to_current_page() {
        let current = Url::parse("https://site.com/blog/").unwrap();
        let links = LinkExtractor::new(&base()).extract(&current, r#"<a href="post-2">P</a>"#);
        assert_eq!(links[0].as_str(), "https://site.com/blog/post-2");
    }

    #[test]
    fn test_www_counts_as_same_site() {
        let html = r#"<a href="https://www.site.com/guide/x">G</a>"#;
        assert_eq!(extract(html), vec!["https://www.site.com/guide/x"]);
    }

    #[test]
    fn test_www_and_bare_host_are_one_link() {
        let html = r#"<a href="/blog/a">A</a><a href="https://www.site.com/blog/a">A again</a>"#;
        assert_eq!(extract(html), vec!["https://site.com/blog/a"]);
    }

    #[test]
    fn test_other_ports_are_other_sites() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let html = r#"<a href="/blog/a">A</a><a href="http://127.0.0.1:9090/blog/b">B</a>"#;
        let links = LinkExtractor::new(&base).extract(&base, html);
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(links, vec!["http://127.0.0.1:8080/blog/a"]);
    }

    #[test]
    fn test_subdomains_are_other_sites() {
        let html = r#"<a href="https://docs.site.com/guide/x">G</a>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_skips_self_links() {
        let current = Url::parse("https://site.com/blog/post-1").unwrap();
        let html = r##"<a href="/blog/post-1#comments">Comments</a><a href="/blog/post-2">Next</a>"##;
        let links = LinkExtractor::new(&base()).extract(&current, html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://site.com/blog/post-2");
    }

    #[test]
    fn test_skip_tel_and_data() {
        let html = r#"<a href="tel:+123">Call</a><a href="data:text/html,hi">D</a><a href="   ">Blank</a>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_pattern_filter() {
        let extractor = LinkExtractor::new(&base()).with_patterns(vec!["/blog/".to_string()]);
        let html = r#"<a href="/about">About</a><a href="/blog/a">A</a>"#;
        let links = extractor.extract(&base(), html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path(), "/blog/a");
    }

    #[test]
    fn test_document_order_and_uniqueness() {
        let html = r#"<a href="/b">B</a><a href="/a">A</a><a href="/b/">B again</a>"#;
        assert_eq!(
            extract(html),
            vec!["https://site.com/b", "https://site.com/a"]
        );
    }
}
