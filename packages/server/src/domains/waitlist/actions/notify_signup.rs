use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::kernel::ServerDeps;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitlistError {
    #[error("Email required")]
    EmailRequired,
}

/// Handles of the notification tasks started for one signup. A channel
/// without configured credentials has no task.
pub struct SignupNotifications {
    pub email: Option<JoinHandle<()>>,
    pub chat: Option<JoinHandle<()>>,
}

impl SignupNotifications {
    /// Wait for both tasks. Only tests need this; the endpoint never waits.
    pub async fn join(self) {
        for handle in [self.email, self.chat].into_iter().flatten() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Signup notification task panicked");
            }
        }
    }
}

pub fn validate_email(raw: Option<&str>) -> Result<String, WaitlistError> {
    match raw.map(str::trim) {
        Some(email) if !email.is_empty() => Ok(email.to_string()),
        _ => Err(WaitlistError::EmailRequired),
    }
}

/// Fire the welcome email and the team chat ping for a new signup.
///
/// Both run as detached tasks; their failures are logged and never reach the
/// caller.
pub fn notify_signup(email: &str, deps: &ServerDeps) -> SignupNotifications {
    info!(email = %email, "New waitlist signup");

    let email_task = deps.email_service.clone().map(|service| {
        let email = email.to_string();
        tokio::spawn(async move {
            if let Err(e) = service.send_welcome_email(&email).await {
                warn!(email = %email, error = %e, "Welcome email failed");
            }
        })
    });
    if email_task.is_none() {
        warn!("Email service not configured, skipping welcome email");
    }

    let chat_task = deps.chat_notifier.clone().map(|notifier| {
        let text = format!("New signup: {}", email);
        tokio::spawn(async move {
            if let Err(e) = notifier.post_message(&text).await {
                warn!(error = %e, "Signup chat notification failed");
            }
        })
    });

    SignupNotifications {
        email: email_task,
        chat: chat_task,
    }
}
