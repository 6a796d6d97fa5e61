//! Auditing domain - Lighthouse results to WCAG-classified findings

pub mod actions;
pub mod models;
pub mod wcag;

pub use actions::{audit_page, AuditError, AuditOutcome};
pub use wcag::{WcagClassifier, WcagInfo};
