pub mod notify_signup;

pub use notify_signup::{notify_signup, validate_email, SignupNotifications, WaitlistError};
