use crate::item::ContentType;
use serde::Deserialize;

/// Main configuration structure for kb-harvester
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Extra URL classification rules, checked before the built-in ones
    #[serde(default)]
    pub classification: Vec<ClassificationRule>,
}

/// Where the content-bearing path filter is applied during a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFilterPolicy {
    /// Follow every same-site link, keep only matching URLs in the output
    #[default]
    Output,
    /// Only follow links that already match a content pattern
    Discovery,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of BFS layers fetched (the seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of page fetches in a single crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Whether the content filter applies at discovery or output time
    #[serde(rename = "filter-links-at", default)]
    pub filter_links_at: LinkFilterPolicy,

    /// Path fragments marking a URL as an extractable article
    #[serde(rename = "content-patterns", default = "default_content_patterns")]
    pub content_patterns: Vec<String>,

    /// URL fragments marking an input as a listing page to crawl
    #[serde(rename = "index-patterns", default = "default_index_patterns")]
    pub index_patterns: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            filter_links_at: LinkFilterPolicy::default(),
            content_patterns: default_content_patterns(),
            index_patterns: default_index_patterns(),
        }
    }
}

/// Which page renderer backs a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// Headless Chrome through a WebDriver endpoint (executes JavaScript)
    #[default]
    Webdriver,
    /// Plain HTTP GET (static HTML only)
    Http,
}

/// Browser/rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub backend: RendererBackend,

    /// WebDriver endpoint (chromedriver)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// User-Agent sent with every navigation
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Navigation timeout used while crawling (seconds)
    #[serde(
        rename = "navigation-timeout-secs",
        default = "default_navigation_timeout"
    )]
    pub navigation_timeout_secs: u64,

    /// Navigation timeout used while extracting a page (seconds)
    #[serde(
        rename = "extract-navigation-timeout-secs",
        default = "default_extract_navigation_timeout"
    )]
    pub extract_navigation_timeout_secs: u64,

    /// How long to wait for the ready selector (seconds)
    #[serde(rename = "ready-timeout-secs", default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,

    /// CSS selector signalling that meaningful content is present
    #[serde(rename = "ready-selector", default = "default_ready_selector")]
    pub ready_selector: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::default(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            user_agent: default_user_agent(),
            navigation_timeout_secs: default_navigation_timeout(),
            extract_navigation_timeout_secs: default_extract_navigation_timeout(),
            ready_timeout_secs: default_ready_timeout(),
            ready_selector: default_ready_selector(),
        }
    }
}

/// PDF parsing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    /// Minimum body length (characters) before a header may close a chapter
    #[serde(rename = "min-chapter-length", default = "default_min_chapter_length")]
    pub min_chapter_length: usize,

    /// Author used when the document has no author metadata
    #[serde(rename = "default-author", default = "default_author")]
    pub default_author: String,

    /// Emit one item per chapter instead of a single merged item
    #[serde(rename = "split-chapters", default)]
    pub split_chapters: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_chapter_length: default_min_chapter_length(),
            default_author: default_author(),
            split_chapters: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Team identifier written into the export envelope
    #[serde(rename = "team-id", default = "default_team_id")]
    pub team_id: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            team_id: default_team_id(),
        }
    }
}

/// URL substring → content type rule
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRule {
    /// Case-insensitive substring matched against the full URL
    pub pattern: String,

    #[serde(rename = "content-type")]
    pub content_type: ContentType,
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_pages() -> usize {
    200
}

fn default_content_patterns() -> Vec<String> {
    [
        "/blog/",
        "/post/",
        "/posts/",
        "/article/",
        "/articles/",
        "/guide/",
        "/guides/",
        "/topics/",
        "/p/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_index_patterns() -> Vec<String> {
    ["topics#companies", "learn#interview-guides", "/blog"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36".to_string()
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_extract_navigation_timeout() -> u64 {
    15
}

fn default_ready_timeout() -> u64 {
    10
}

fn default_ready_selector() -> String {
    "h1, article, .post-content, .entry-content".to_string()
}

fn default_min_chapter_length() -> usize {
    500
}

fn default_author() -> String {
    "Unknown".to_string()
}

fn default_team_id() -> String {
    "default".to_string()
}
