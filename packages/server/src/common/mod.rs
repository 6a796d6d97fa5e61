// Common types and utilities shared across the application

pub mod url;
pub mod utils;

pub use self::url::{normalize_url, UrlError};
pub use utils::{ResendClient, SlackWebhook};
