use url::Url;

/// Extracts the registrable domain from a URL
///
/// This is the lowercase host with a conventional `www.` prefix stripped.
/// It is what same-site comparisons and the fallback author use.
///
/// # Returns
///
/// * `Some(String)` - The registrable domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_harvester::url::registrable_domain;
///
/// let url = Url::parse("https://www.Example.com/path").unwrap();
/// assert_eq!(registrable_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://blog.example.com/path").unwrap();
/// assert_eq!(registrable_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn registrable_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }

    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => Some(rest.to_string()),
        _ => Some(host),
    }
}

/// Returns true if both URLs belong to the same site
///
/// The registrable domains must match, and so must any explicit ports.
/// Subdomains other than `www.` count as different sites.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Some(domain_a), Some(domain_b)) => domain_a == domain_b && a.port() == b.port(),
        _ => false,
    }
}

/// Identity of a page within a site
///
/// Built from the registrable domain, explicit port, path and query, so the
/// `www.` and bare-host forms of one page (or its http and https forms) share
/// a key. Expects an already normalized URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kb_harvester::url::site_key;
///
/// let bare = Url::parse("https://site.com/blog/a?page=2").unwrap();
/// let www = Url::parse("http://www.site.com/blog/a?page=2").unwrap();
/// assert_eq!(site_key(&bare), site_key(&www));
/// ```
pub fn site_key(url: &Url) -> Option<String> {
    let mut key = registrable_domain(url)?;
    if let Some(port) = url.port() {
        key.push_str(&format!(":{}", port));
    }
    key.push_str(url.path());
    if let Some(query) = url.query() {
        key.push('?');
        key.push_str(query);
    }
    Some(key)
}
