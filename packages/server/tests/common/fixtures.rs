//! Test fixtures for scan scenarios.

use std::time::Duration;

use chrono::Utc;
use server_core::domains::scans::{NewScanRecord, ScanRequest};
use server_core::kernel::test_dependencies::{
    failing_audit, lighthouse_report, passing_audit, InMemoryScanStore, MockAuditor,
};
use server_core::kernel::TestDependencies;

pub const HOME: &str = "https://clinic.example";

pub const HOME_HTML: &str = r#"
<html><body>
  <nav>
    <a href="/blog">Blog</a>
    <a href="/contact-us/">Contact us</a>
    <a href="/about">About</a>
    <a href="https://facebook.com/clinic">Facebook</a>
    <a href="tel:5551234">Call</a>
  </nav>
</body></html>
"#;

pub fn scan_request(website_url: &str, session_id: &str, client_ip: &str) -> ScanRequest {
    ScanRequest {
        website_url: website_url.to_string(),
        session_id: session_id.to_string(),
        client_ip: client_ip.to_string(),
    }
}

/// Homepage with two failing rules, one WCAG-mapped and one not.
pub fn homepage_auditor(url: &str) -> MockAuditor {
    MockAuditor::new().with_report(
        url,
        lighthouse_report(
            0.82,
            vec![
                failing_audit("color-contrast", 0.0, 3),
                passing_audit("document-title"),
                failing_audit("vendor-widget-check", 0.4, 1),
            ],
        ),
    )
}

pub fn failing_auditor(url: &str, message: &str) -> MockAuditor {
    MockAuditor::new().with_failure(url, message)
}

/// Homepage plus the three subpages linked from `HOME_HTML`.
pub fn site_auditor() -> MockAuditor {
    homepage_auditor(HOME)
        .with_report(
            &format!("{}/contact-us", HOME),
            lighthouse_report(0.9, vec![failing_audit("label", 0.0, 12)]),
        )
        .with_report(
            &format!("{}/about", HOME),
            lighthouse_report(0.7, vec![failing_audit("color-contrast", 0.0, 1)]),
        )
        .with_report(&format!("{}/blog", HOME), lighthouse_report(1.0, vec![]))
}

pub fn slow_site_auditor(homepage_delay: Duration, subpage_delay: Duration) -> MockAuditor {
    MockAuditor::new()
        .with_delayed_report(
            HOME,
            lighthouse_report(0.8, vec![failing_audit("image-alt", 0.0, 2)]),
            homepage_delay,
        )
        .with_delayed_report(
            &format!("{}/contact-us", HOME),
            lighthouse_report(0.6, vec![]),
            subpage_delay,
        )
        .with_delayed_report(
            &format!("{}/about", HOME),
            lighthouse_report(0.6, vec![]),
            subpage_delay,
        )
}

/// Seed `count` attempts from `client_ip` made just now.
pub fn seed_attempts(store: &InMemoryScanStore, client_ip: &str, count: usize) {
    for i in 0..count {
        store.seed(
            NewScanRecord::failed(
                &format!("seed-{}-{}", client_ip, i),
                &format!("https://site-{}.example", i),
                client_ip,
                1_000,
                "2.0-psi",
            ),
            Utc::now(),
        );
    }
}

pub fn deps_with(auditor: MockAuditor) -> TestDependencies {
    TestDependencies::new().mock_auditor(auditor)
}
