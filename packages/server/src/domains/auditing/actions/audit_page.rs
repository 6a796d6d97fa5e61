//! Audit one page and turn the raw Lighthouse report into ranked findings.

use pagespeed_client::{LighthouseAudit, LighthouseResult};
use thiserror::Error;
use tracing::{debug, info};

use crate::domains::auditing::models::Finding;
use crate::domains::auditing::wcag::{severity, WcagClassifier};
use crate::kernel::BaseAccessibilityAuditor;

/// Sampled elements kept per finding.
pub const MAX_ELEMENT_SAMPLES: usize = 5;

/// The external audit of `url` failed.
#[derive(Debug, Error)]
#[error("Audit failed for {url}: {cause}")]
pub struct AuditError {
    pub url: String,
    #[source]
    pub cause: anyhow::Error,
}

impl AuditError {
    /// Message shown to the caller when the homepage audit aborts the scan.
    pub fn user_message(&self) -> String {
        self.cause.to_string()
    }
}

/// Score and findings for one audited page.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub score: u8,
    pub findings: Vec<Finding>,
    pub final_url: Option<String>,
}

/// Run the external audit for `url` and classify every failing rule.
pub async fn audit_page(
    url: &str,
    auditor: &dyn BaseAccessibilityAuditor,
    classifier: &WcagClassifier,
) -> Result<AuditOutcome, AuditError> {
    debug!(url = %url, "Running accessibility audit");

    let report = auditor.run_audit(url).await.map_err(|cause| AuditError {
        url: url.to_string(),
        cause,
    })?;

    let outcome = build_outcome(url, &report, classifier);

    info!(
        url = %url,
        score = outcome.score,
        findings = outcome.findings.len(),
        "Audit complete"
    );

    Ok(outcome)
}

/// Convert a Lighthouse report into an `AuditOutcome` for `page_url`.
pub fn build_outcome(
    page_url: &str,
    report: &LighthouseResult,
    classifier: &WcagClassifier,
) -> AuditOutcome {
    let mut findings: Vec<Finding> = report
        .audits
        .iter()
        .filter(|(_, audit)| is_failing(audit))
        .map(|(rule_id, audit)| build_finding(rule_id, audit, page_url, classifier))
        .collect();

    // sort_by_key is stable, so ties keep report order
    findings.sort_by_key(|f| f.severity);

    AuditOutcome {
        score: score_percent(report.accessibility_score()),
        findings,
        final_url: report.final_url.clone(),
    }
}

fn is_failing(audit: &LighthouseAudit) -> bool {
    match audit.score {
        None => false,
        Some(score) if score >= 1.0 => false,
        Some(_) => !audit.is_not_scored(),
    }
}

fn build_finding(
    rule_id: &str,
    audit: &LighthouseAudit,
    page_url: &str,
    classifier: &WcagClassifier,
) -> Finding {
    let item_count = audit.item_count();
    let wcag = classifier.classify(rule_id);

    let elements: Vec<String> = audit
        .items()
        .iter()
        .filter_map(|item| item.sample())
        .take(MAX_ELEMENT_SAMPLES)
        .map(str::to_string)
        .collect();

    Finding {
        id: rule_id.to_string(),
        check: audit.title.clone(),
        severity: severity(audit.score, item_count),
        message: first_sentence(&audit.description),
        details: affected_details(item_count),
        count: (item_count > 0).then_some(item_count as u32),
        wcag_criterion: wcag.map(|w| w.criterion.to_string()),
        wcag_name: wcag.map(|w| w.name.to_string()),
        wcag_level: wcag.map(|w| w.level),
        wcag_principle: wcag.map(|w| w.principle),
        page_url: page_url.to_string(),
        remediation: classifier.remediation(rule_id).to_string(),
        elements: (!elements.is_empty()).then_some(elements),
    }
}

/// Text up to the first `.`, with the period restored. Descriptions without a
/// period come back whole with a `.` appended.
pub fn first_sentence(description: &str) -> String {
    let head = description.split('.').next().unwrap_or_default();
    format!("{}.", head)
}

fn affected_details(item_count: usize) -> Option<String> {
    match item_count {
        0 => None,
        1 => Some("1 element affected".to_string()),
        n => Some(format!("{} elements affected", n)),
    }
}

/// Category score in [0, 1] as a rounded percentage.
pub fn score_percent(category_score: f64) -> u8 {
    (category_score.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auditing::models::{Severity, WcagLevel};
    use crate::kernel::test_dependencies::{
        failing_audit, lighthouse_report, passing_audit, MockAuditor,
    };

    fn not_applicable(id: &str) -> LighthouseAudit {
        LighthouseAudit {
            score_display_mode: "notApplicable".to_string(),
            score: Some(0.0),
            ..failing_audit(id, 0.0, 0)
        }
    }

    #[test]
    fn test_build_outcome_skips_passing_null_and_not_applicable() {
        let mut null_score = failing_audit("tabindex", 0.0, 1);
        null_score.score = None;

        let report = lighthouse_report(
            0.9,
            vec![
                passing_audit("document-title"),
                null_score,
                not_applicable("video-caption"),
                failing_audit("link-name", 0.0, 2),
            ],
        );

        let outcome = build_outcome("https://x.com", &report, &WcagClassifier::new());

        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].id, "link-name");
        assert_eq!(outcome.score, 90);
    }

    #[test]
    fn test_findings_sorted_by_severity_stable_on_ties() {
        let report = lighthouse_report(
            0.5,
            vec![
                failing_audit("label", 0.7, 1),
                failing_audit("image-alt", 0.0, 12),
                failing_audit("heading-order", 0.8, 1),
                failing_audit("link-name", 0.3, 1),
            ],
        );

        let outcome = build_outcome("https://x.com", &report, &WcagClassifier::new());
        let ids: Vec<&str> = outcome.findings.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(ids, vec!["image-alt", "link-name", "label", "heading-order"]);
        assert_eq!(outcome.findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_finding_fields_for_mapped_and_unmapped_rules() {
        let report = lighthouse_report(
            0.82,
            vec![
                failing_audit("color-contrast", 0.0, 7),
                failing_audit("custom-rule", 0.0, 1),
            ],
        );

        let outcome = build_outcome("https://example.com", &report, &WcagClassifier::new());

        let contrast = &outcome.findings[0];
        assert_eq!(contrast.id, "color-contrast");
        assert_eq!(contrast.severity, Severity::High);
        assert_eq!(contrast.wcag_criterion.as_deref(), Some("1.4.3"));
        assert_eq!(contrast.wcag_level, Some(WcagLevel::AA));
        assert_eq!(contrast.details.as_deref(), Some("7 elements affected"));
        assert_eq!(contrast.count, Some(7));
        assert_eq!(contrast.elements.as_ref().map(Vec::len), Some(MAX_ELEMENT_SAMPLES));
        assert_eq!(contrast.message, "The color-contrast rule failed.");

        let custom = &outcome.findings[1];
        assert!(custom.wcag_criterion.is_none());
        assert!(custom.wcag_principle.is_none());
        assert_eq!(custom.details.as_deref(), Some("1 element affected"));
        assert_eq!(custom.remediation, crate::domains::auditing::wcag::GENERIC_REMEDIATION);
        assert_eq!(custom.page_url, "https://example.com");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Links need names. More text."), "Links need names.");
        assert_eq!(first_sentence("No period here"), "No period here.");
        assert_eq!(first_sentence(""), ".");
    }

    #[test]
    fn test_score_percent_rounds() {
        assert_eq!(score_percent(0.826), 83);
        assert_eq!(score_percent(0.82), 82);
        assert_eq!(score_percent(0.0), 0);
        assert_eq!(score_percent(1.0), 100);
    }

    #[tokio::test]
    async fn test_audit_page_wraps_collaborator_error() {
        let auditor = MockAuditor::new().with_failure("https://x.com", "PageSpeed API error: 500");

        let err = audit_page("https://x.com", &auditor, &WcagClassifier::new())
            .await
            .unwrap_err();

        assert_eq!(err.url, "https://x.com");
        assert_eq!(err.user_message(), "PageSpeed API error: 500");
    }
}
