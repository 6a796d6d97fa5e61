// HTTP routes
pub mod health;
pub mod scan;
pub mod waitlist;

pub use health::*;
pub use scan::*;
pub use waitlist::*;
