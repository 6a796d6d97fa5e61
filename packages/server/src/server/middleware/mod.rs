// HTTP middleware
pub mod cors;
pub mod ip_extractor;

pub use cors::*;
pub use ip_extractor::*;
