pub mod aggregate;
pub mod guards;
pub mod run_scan;

pub use guards::{check_rate_limit, find_cached_report};
pub use run_scan::{run_scan, ScanStage};
