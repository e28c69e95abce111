//! Page extraction
//!
//! Turns one rendered page into a [`ContentItem`]: title, author, a markdown
//! body and a content type derived from the URL. Failures never escape as
//! errors; [`PageExtractor::scrape`] reports them as error items instead.

mod author;
mod classify;
mod markdown;

pub use author::{extract_author, extract_title};
pub use classify::classify_url;
pub use markdown::{clean_text, to_markdown, CodeBlock};

use crate::config::{ClassificationRule, Config};
use crate::item::{ContentItem, ContentType};
use crate::render::{RenderOptions, RenderSession};
use scraper::Html;
use url::Url;

/// Converts rendered pages into knowledge items
#[derive(Debug, Clone)]
pub struct PageExtractor {
    rules: Vec<ClassificationRule>,
    options: RenderOptions,
}

impl PageExtractor {
    pub fn new(rules: Vec<ClassificationRule>, options: RenderOptions) -> Self {
        Self { rules, options }
    }

    /// Extractor using the configured rules and extraction timeouts
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.classification.clone(),
            RenderOptions::for_extraction(&config.browser),
        )
    }

    /// Builds an item from already rendered markup
    ///
    /// # Example
    ///
    /// ```
    /// use kb_harvester::{ContentType, PageExtractor};
    /// use kb_harvester::render::RenderOptions;
    /// use url::Url;
    ///
    /// let extractor = PageExtractor::new(Vec::new(), RenderOptions::default());
    /// let url = Url::parse("https://site.com/blog/hello").unwrap();
    /// let item = extractor.extract(&url, "<h1>Hello</h1><p>World</p>");
    ///
    /// assert_eq!(item.title(), "Hello");
    /// assert_eq!(item.author(), "site.com");
    /// assert_eq!(item.content_type(), ContentType::Blog);
    /// ```
    pub fn extract(&self, url: &Url, html: &str) -> ContentItem {
        let document = Html::parse_document(html);

        let title = extract_title(&document);
        let author = extract_author(&document, url);
        let content = to_markdown(&document);
        let content_type = self.classify(url.as_str());

        tracing::debug!(
            "Extracted '{}' from {} ({} chars, {})",
            title,
            url,
            content.len(),
            content_type
        );

        ContentItem::new(title, content, content_type, url.as_str(), author)
    }

    /// Renders `url` with `session` and extracts it
    ///
    /// Any fetch failure yields an error item carrying the diagnostic.
    pub async fn scrape(&self, session: &dyn RenderSession, url: &Url) -> ContentItem {
        tracing::info!("Scraping: {}", url);

        match session.render(url, &self.options).await {
            Ok(page) => self.extract(url, &page.html),
            Err(e) => {
                tracing::warn!("Failed to scrape {}: {}", url, e);
                ContentItem::error(format!("Failed to scrape URL: {}", e))
            }
        }
    }

    /// Content type for a source URL
    pub fn classify(&self, url: &str) -> ContentType {
        classify_url(url, &self.rules)
    }

    /// Recomputes the content type of an extracted item
    ///
    /// Error items are returned unchanged.
    pub fn reclassify(&self, item: &ContentItem) -> ContentItem {
        if item.is_error() {
            return item.clone();
        }

        ContentItem::new(
            item.title(),
            item.content(),
            self.classify(item.source_url()),
            item.source_url(),
            item.author(),
        )
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
