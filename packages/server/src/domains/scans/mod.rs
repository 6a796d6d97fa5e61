//! Scans domain - orchestrates a scan request and keeps the attempt log

pub mod actions;
pub mod errors;
pub mod models;
pub mod types;

pub use actions::run_scan;
pub use errors::ScanError;
pub use models::{NewScanRecord, PostgresScanStore, ScanRecord, StoreError};
pub use types::{ScanReport, ScanRequest, ScanRequestBody, ScanResponse, Teaser};
