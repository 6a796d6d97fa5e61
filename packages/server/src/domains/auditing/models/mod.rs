pub mod finding;
pub mod page_result;
pub mod summary;

pub use finding::*;
pub use page_result::*;
pub use summary::*;
