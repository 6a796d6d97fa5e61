//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod html_fetcher;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PageSpeedAdapter, ServerDeps};
pub use html_fetcher::{HttpHtmlFetcher, SCANNER_USER_AGENT};
pub use test_dependencies::TestDependencies;
pub use traits::*;
