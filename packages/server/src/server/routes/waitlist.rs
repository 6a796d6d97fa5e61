use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::waitlist::{notify_signup, validate_email};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WaitlistRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub success: bool,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct WaitlistErrorBody {
    pub error: String,
}

/// `POST /notify-waitlist`
///
/// Responds as soon as the notifications are dispatched; their outcome is
/// only logged.
pub async fn notify_waitlist_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<WaitlistRequest>, JsonRejection>,
) -> Response {
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let email = match validate_email(request.email.as_deref()) {
        Ok(email) => email,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(WaitlistErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    // Detached: the handles are dropped, the tasks keep running
    let _ = notify_signup(&email, &state.deps);

    Json(WaitlistResponse {
        success: true,
        email,
    })
    .into_response()
}
