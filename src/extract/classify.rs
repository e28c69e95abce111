use crate::config::ClassificationRule;
use crate::item::ContentType;

/// URL substrings checked after configured rules, first match wins
const BUILTIN_RULES: &[(&str, ContentType)] = &[
    ("topics#companies", ContentType::CompanyGuide),
    ("learn#interview-guides", ContentType::Blog),
    ("/topics/", ContentType::CompanyGuide),
    ("/guides/", ContentType::CompanyGuide),
    ("/guide/", ContentType::CompanyGuide),
    ("/blog", ContentType::Blog),
    ("/post/", ContentType::Blog),
    ("/posts/", ContentType::Blog),
];

/// Classifies a page by its URL
///
/// Configured rules are checked first, then the built-in ones. Matching is a
/// case-insensitive substring test on the whole URL, fragment included. The
/// result only depends on the URL, so classifying twice is stable.
pub fn classify_url(url: &str, rules: &[ClassificationRule]) -> ContentType {
    let url = url.to_lowercase();

    let configured = rules
        .iter()
        .find(|rule| url.contains(&rule.pattern.to_lowercase()))
        .map(|rule| rule.content_type);

    let builtin = || {
        BUILTIN_RULES
            .iter()
            .find(|(pattern, _)| url.contains(pattern))
            .map(|(_, content_type)| *content_type)
    };

    configured.or_else(builtin).unwrap_or(ContentType::Blog)
}
