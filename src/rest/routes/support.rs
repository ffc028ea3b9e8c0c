// rest/routes/support.rs — Support ticket forwarding.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

#[derive(Deserialize)]
pub struct SupportRequest {
    pub email: Option<String>,
    pub message: Option<String>,
}

pub async fn send_support(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SupportRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, message) = match (
        body.email.as_deref().filter(|e| !e.is_empty()),
        body.message.as_deref().filter(|m| !m.is_empty()),
    ) {
        (Some(email), Some(message)) => (email, message),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email and message are required" })),
            ))
        }
    };

    match ctx.mailer.send(email, message).await {
        Ok(()) => {
            info!(from = %email, "support request forwarded");
            Ok(Json(json!({ "success": true })))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
