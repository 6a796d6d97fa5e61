//! Crawling domain - finds which subpages of a site are worth auditing

pub mod actions;
pub mod links;

pub use actions::discover_subpages;
pub use links::{extract_links, prioritize, PRIORITY_KEYWORDS};
