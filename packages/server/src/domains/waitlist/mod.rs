//! Waitlist domain - best-effort notifications for new signups

pub mod actions;

pub use actions::{notify_signup, validate_email, WaitlistError};
