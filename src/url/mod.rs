//! URL handling module for kb-harvester
//!
//! This module provides URL normalization, registrable-domain extraction,
//! content-bearing path matching, and cleanup of user-supplied input URLs.

mod domain;
mod matcher;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{registrable_domain, same_site, site_key};
pub use matcher::{matches_content_pattern, matches_index_pattern};
pub use normalize::{normalize_parsed, normalize_url};

/// Cleans up a URL typed by a user
///
/// Surrounding whitespace and quotes are removed and `https://` is assumed
/// when no scheme is given. The result must have a host.
///
/// # Examples
///
/// ```
/// use kb_harvester::url::parse_input_url;
///
/// let url = parse_input_url(" 'interviewing.io/blog' ").unwrap();
/// assert_eq!(url.as_str(), "https://interviewing.io/blog");
/// ```
pub fn parse_input_url(input: &str) -> UrlResult<Url> {
    let cleaned = input.trim().trim_matches(|c| c == '\'' || c == '"').trim();

    if cleaned.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        cleaned.to_string()
    } else if cleaned.contains("://") {
        let scheme = cleaned.split("://").next().unwrap_or_default();
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    } else {
        format!("https://{}", cleaned)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
