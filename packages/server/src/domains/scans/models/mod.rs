pub mod scan_record;
pub mod store;

pub use scan_record::*;
pub use store::*;
