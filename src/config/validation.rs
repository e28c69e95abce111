use crate::config::types::{
    BrowserConfig, ClassificationRule, Config, CrawlerConfig, OutputConfig, PdfConfig,
};
use crate::item::ContentType;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on crawl depth; deeper BFS explodes on real sites
const MAX_CRAWL_DEPTH: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_pdf_config(&config.pdf)?;
    validate_output_config(&config.output)?;
    validate_classification_rules(&config.classification)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth > MAX_CRAWL_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max-depth must be <= {}, got {}",
            MAX_CRAWL_DEPTH, config.max_depth
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.content_patterns.is_empty() {
        return Err(ConfigError::Validation(
            "content-patterns cannot be empty".to_string(),
        ));
    }

    for pattern in &config.content_patterns {
        validate_path_pattern(pattern)?;
    }

    for pattern in &config.index_patterns {
        if pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "index pattern cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "webdriver-url must be http or https, got '{}'",
            config.webdriver_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("navigation-timeout-secs", config.navigation_timeout_secs),
        (
            "extract-navigation-timeout-secs",
            config.extract_navigation_timeout_secs,
        ),
        ("ready-timeout-secs", config.ready_timeout_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    Selector::parse(&config.ready_selector).map_err(|e| {
        ConfigError::InvalidPattern(format!(
            "ready-selector '{}' is not a valid CSS selector: {:?}",
            config.ready_selector, e
        ))
    })?;

    Ok(())
}

/// Validates PDF configuration
fn validate_pdf_config(config: &PdfConfig) -> Result<(), ConfigError> {
    if config.min_chapter_length < 1 {
        return Err(ConfigError::Validation(
            "min-chapter-length must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.team_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "team-id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates user-supplied URL classification rules
fn validate_classification_rules(rules: &[ClassificationRule]) -> Result<(), ConfigError> {
    for rule in rules {
        if rule.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "classification pattern cannot be empty".to_string(),
            ));
        }

        if rule.content_type == ContentType::Error {
            return Err(ConfigError::Validation(format!(
                "classification rule '{}' cannot map to the error content type",
                rule.pattern
            )));
        }
    }
    Ok(())
}

/// Validates a content-bearing path pattern such as "/blog/"
fn validate_path_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "content pattern cannot be empty".to_string(),
        ));
    }

    if !pattern.starts_with('/') {
        return Err(ConfigError::InvalidPattern(format!(
            "content pattern '{}' must start with '/'",
            pattern
        )));
    }

    if pattern.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidPattern(format!(
            "content pattern '{}' cannot contain whitespace",
            pattern
        )));
    }

    Ok(())
}
