// rest/routes/history.rs — Recently analyzed snippets.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

pub async fn list_history(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let history = match ctx.history.list().await {
        Ok(history) => history,
        Err(e) => {
            warn!(err = %e, "history read failed — returning empty");
            Vec::new()
        }
    };
    Json(json!({ "history": history }))
}

#[derive(Deserialize)]
pub struct PushHistoryRequest {
    pub code: Option<String>,
}

pub async fn push_history(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<PushHistoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let code = match body.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No code provided" })),
            ))
        }
    };
    match ctx.history.push(code).await {
        Ok(history) => Ok(Json(json!({ "history": history }))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
