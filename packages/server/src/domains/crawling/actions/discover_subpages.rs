use tracing::{info, warn};

use crate::domains::crawling::links::{extract_links, prioritize};
use crate::kernel::ServerDeps;

/// Candidate subpages of `homepage_url`, best first.
///
/// Never fails: a fetch error or timeout yields an empty list and the scan
/// carries on with the homepage alone.
pub async fn discover_subpages(homepage_url: &str, deps: &ServerDeps) -> Vec<String> {
    let timeout = deps.settings.html_fetch_timeout;

    let html = match tokio::time::timeout(timeout, deps.html_fetcher.fetch_html(homepage_url)).await
    {
        Ok(Ok(html)) => html,
        Ok(Err(e)) => {
            warn!(url = %homepage_url, error = %e, "Crawl failed, skipping subpages");
            return vec![];
        }
        Err(_) => {
            warn!(
                url = %homepage_url,
                timeout_ms = timeout.as_millis() as u64,
                "Crawl timed out, skipping subpages"
            );
            return vec![];
        }
    };

    let links = extract_links(&html, homepage_url);
    let candidates = prioritize(&links, homepage_url, deps.settings.max_candidates);

    info!(
        url = %homepage_url,
        links = links.len(),
        candidates = candidates.len(),
        "Discovered internal links"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{MockHtmlFetcher, TestDependencies};
    use std::time::Duration;

    const HOME: &str = "https://clinic.com";

    #[tokio::test]
    async fn test_discover_subpages_ranks_candidates() {
        let html = r#"
            <a href="/blog">Blog</a>
            <a href="/gallery">Gallery</a>
            <a href="/new-patients/">New patients</a>
            <a href="/">Home</a>
            <a href="/contact">Contact</a>
        "#;
        let deps = TestDependencies::new()
            .mock_fetcher(MockHtmlFetcher::new().with_page(HOME, html))
            .into_server_deps();

        let candidates = discover_subpages(HOME, &deps).await;

        assert_eq!(
            candidates,
            vec![
                "https://clinic.com/new-patients",
                "https://clinic.com/contact",
                "https://clinic.com/blog",
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_subpages_fetch_error_is_empty() {
        let deps = TestDependencies::new().into_server_deps();

        assert!(discover_subpages(HOME, &deps).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discover_subpages_timeout_is_empty() {
        let fetcher = MockHtmlFetcher::new()
            .with_page(HOME, r#"<a href="/contact">Contact</a>"#)
            .with_delay(Duration::from_secs(30));
        let deps = TestDependencies::new().mock_fetcher(fetcher).into_server_deps();

        assert!(discover_subpages(HOME, &deps).await.is_empty());
    }
}
