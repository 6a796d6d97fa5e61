//! Pre-audit checks against scan history. Both fail open: a store outage
//! neither rejects the client nor blocks a fresh scan.

use chrono::Utc;
use tracing::{info, warn};

use super::aggregate::cached_report;
use crate::domains::scans::errors::ScanError;
use crate::domains::scans::types::ScanReport;
use crate::kernel::ServerDeps;

/// Reject `client_ip` once it has used up its scans in the trailing window.
pub async fn check_rate_limit(client_ip: &str, deps: &ServerDeps) -> Result<(), ScanError> {
    let settings = &deps.settings;
    let since = Utc::now() - settings.rate_limit_window;

    match deps.scan_store.count_by_client_since(client_ip, since).await {
        Ok(count) if count >= settings.rate_limit_max_scans => {
            info!(client_ip = %client_ip, count, "Rate limit exceeded");
            Err(ScanError::RateLimited {
                retry_after: settings.retry_after_secs,
            })
        }
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(client_ip = %client_ip, error = %e, "Rate limit check failed, allowing request");
            Ok(())
        }
    }
}

/// Report of the latest successful scan of `website_url` still inside the
/// cache window, whichever client requested it.
pub async fn find_cached_report(website_url: &str, deps: &ServerDeps) -> Option<ScanReport> {
    let since = Utc::now() - deps.settings.cache_ttl;

    match deps.scan_store.latest_by_url_since(website_url, since).await {
        Ok(Some(record)) => {
            info!(url = %website_url, session_id = %record.session_id, "Serving cached scan");
            Some(cached_report(&record))
        }
        Ok(None) => None,
        Err(e) => {
            warn!(url = %website_url, error = %e, "Cache lookup failed, scanning fresh");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::scans::models::NewScanRecord;
    use crate::kernel::test_dependencies::{InMemoryScanStore, TestDependencies};

    fn attempt(session_id: &str, url: &str, ip: &str) -> NewScanRecord {
        NewScanRecord::failed(session_id, url, ip, 100, "2.0-psi")
    }

    #[tokio::test]
    async fn test_rate_limit_counts_window_only() {
        let test_deps = TestDependencies::new();
        let store = test_deps.scan_store.clone();
        let deps = test_deps.into_server_deps();

        for i in 0..5 {
            store.seed(attempt(&format!("old-{i}"), "https://x.com", "9.9.9.9"), Utc::now());
        }
        assert!(matches!(
            check_rate_limit("9.9.9.9", &deps).await,
            Err(ScanError::RateLimited { retry_after: 3600 })
        ));
        assert!(check_rate_limit("8.8.8.8", &deps).await.is_ok());

        store.age_all(chrono::Duration::minutes(61));
        assert!(check_rate_limit("9.9.9.9", &deps).await.is_ok());
    }

    #[tokio::test]
    async fn test_guards_fail_open_on_store_error() {
        let deps = TestDependencies::new()
            .mock_store(InMemoryScanStore::new().with_failing_reads())
            .into_server_deps();

        assert!(check_rate_limit("9.9.9.9", &deps).await.is_ok());
        assert!(find_cached_report("https://x.com", &deps).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_ignores_failed_attempts() {
        let test_deps = TestDependencies::new();
        test_deps
            .scan_store
            .seed(attempt("failed", "https://x.com", "1.1.1.1"), Utc::now());
        let deps = test_deps.into_server_deps();

        assert!(find_cached_report("https://x.com", &deps).await.is_none());
    }
}
