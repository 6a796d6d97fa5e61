pub mod resend;
pub mod slack;

pub use resend::*;
pub use slack::*;
