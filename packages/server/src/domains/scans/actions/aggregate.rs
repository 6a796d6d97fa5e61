//! Reductions from page results to the report and teaser.

use std::collections::HashSet;

use crate::domains::auditing::models::{Finding, PageResult};
use crate::domains::scans::models::ScanRecord;
use crate::domains::scans::types::{ScanReport, Teaser};

pub const NO_ISSUES: &str = "No issues found";
const GENERIC_TOP_ISSUE: &str = "Accessibility issues detected";

/// Message of the first finding, which is the most severe on the homepage.
pub fn top_issue(findings: &[Finding]) -> String {
    match findings.first() {
        None => NO_ISSUES.to_string(),
        Some(f) if f.message.trim().is_empty() || f.message == "." => {
            GENERIC_TOP_ISSUE.to_string()
        }
        Some(f) => f.message.clone(),
    }
}

/// Number of distinct rule ids across `findings`.
pub fn distinct_issue_count(findings: &[Finding]) -> u32 {
    findings
        .iter()
        .map(|f| f.id.as_str())
        .collect::<HashSet<_>>()
        .len() as u32
}

/// Rounded mean of page scores, 0 when nothing was scanned.
pub fn average_score(page_results: &[PageResult]) -> u8 {
    if page_results.is_empty() {
        return 0;
    }
    let total: u32 = page_results
        .iter()
        .map(|p| u32::from(p.accessibility_score))
        .sum();
    (f64::from(total) / page_results.len() as f64).round() as u8
}

pub fn build_teaser(findings: &[Finding], accessibility_score: Option<u8>) -> Teaser {
    Teaser {
        top_issue: top_issue(findings),
        issue_count: distinct_issue_count(findings),
        accessibility_score,
    }
}

/// Response served from a stored record on a cache hit.
pub fn cached_report(record: &ScanRecord) -> ScanReport {
    let pages_scanned = record
        .page_results
        .len()
        .max(record.pages_scanned.max(0) as usize)
        .max(1);

    ScanReport {
        success: true,
        session_id: record.session_id.clone(),
        summary: record.summary.clone(),
        teaser: build_teaser(&record.findings, record.summary.accessibility_score),
        pages_scanned: Some(pages_scanned as u32),
        page_results: None,
        cached: Some(true),
    }
}
