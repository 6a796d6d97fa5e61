pub mod discover_subpages;

pub use discover_subpages::discover_subpages;
