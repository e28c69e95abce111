use url::Url;

/// Checks if a URL path matches any content-bearing path pattern
///
/// A pattern such as `/blog/` matches when it occurs anywhere in the path,
/// so `/blog/how-to-prepare` and `/en/blog/x` match while the listing page
/// `/blog` itself does not (trailing slashes are normalized away).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_harvester::url::matches_content_pattern;
///
/// let patterns = vec!["/blog/".to_string()];
/// let post = Url::parse("https://site.com/blog/post-1").unwrap();
/// let index = Url::parse("https://site.com/blog").unwrap();
/// assert!(matches_content_pattern(&post, &patterns));
/// assert!(!matches_content_pattern(&index, &patterns));
/// ```
pub fn matches_content_pattern(url: &Url, patterns: &[String]) -> bool {
    let path = url.path().to_lowercase();
    patterns
        .iter()
        .any(|pattern| path.contains(&pattern.to_lowercase()))
}

/// Checks if a raw input URL looks like a listing ("index") page
///
/// Matching is done on the raw string so fragment-based listings such as
/// `topics#companies` are recognised before normalization strips them.
pub fn matches_index_pattern(raw_url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| raw_url.contains(pattern.as_str()))
}
