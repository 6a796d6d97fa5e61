use serde::{Deserialize, Serialize};

use super::{Finding, Severity};

/// Severity counts over a set of findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_score: Option<u8>,
}

impl Summary {
    /// Reduce `findings` into counts, attaching an externally computed score.
    pub fn from_findings(findings: &[Finding], accessibility_score: Option<u8>) -> Self {
        let mut summary = Summary {
            total: findings.len() as u32,
            accessibility_score,
            ..Default::default()
        };

        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }

        summary
    }

    /// All-zero summary recorded for a failed scan attempt.
    pub fn empty() -> Self {
        Self::default()
    }
}
