pub mod audit_page;

pub use audit_page::{audit_page, build_outcome, AuditError, AuditOutcome};
