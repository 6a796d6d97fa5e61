//! Same-site link extraction and audience-relevance ranking.

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// Path fragments that mark a page as relevant to patients and clients.
pub const PRIORITY_KEYWORDS: &[&str] = &[
    "contact",
    "patient",
    "appointment",
    "schedule",
    "new-patient",
    "forms",
    "about",
    "services",
    "team",
    "staff",
    "doctors",
    "providers",
    "locations",
    "insurance",
    "billing",
    "portal",
];

const SKIPPED_HREF_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Extract same-host links from `html`, resolved against `base_url` and
/// reduced to origin + path without a trailing slash. Document order,
/// duplicates dropped.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return vec![];
    };
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return vec![];
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&link_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| {
            let lower = href.to_ascii_lowercase();
            !SKIPPED_HREF_PREFIXES.iter().any(|p| lower.starts_with(p))
        })
        .filter_map(|href| base.join(href).ok())
        .filter(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str() == base.host_str()
        })
        .map(|url| origin_and_path(&url))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

fn origin_and_path(url: &Url) -> String {
    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    format!("{}{}", url.origin().ascii_serialization(), path)
}

/// Rank `links` for auditing: keyword matches first, then the rest, each group
/// in input order. `base_url` itself is never returned.
pub fn prioritize(links: &[String], base_url: &str, max: usize) -> Vec<String> {
    let (priority, other): (Vec<&String>, Vec<&String>) = links
        .iter()
        .filter(|link| link.as_str() != base_url)
        .partition(|link| is_priority(link));

    priority
        .into_iter()
        .chain(other)
        .take(max)
        .cloned()
        .collect()
}

fn is_priority(link: &str) -> bool {
    let lower = link.to_lowercase();
    PRIORITY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
