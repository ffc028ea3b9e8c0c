// rest/routes/ai.rs — Gemini passthrough routes.
//
// Every external failure degrades to a canned user-facing string with HTTP
// 200; only payload validation produces a non-200. The chat UI must always
// have something renderable.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::gateway::{prompts, GatewayError};
use crate::AppContext;

const DEBUG_NO_KEY: &str =
    "Error: Gemini API key is not configured. Please check server settings.";
const CHAT_NO_KEY: &str =
    "Error: Gemini API key is not configured. Please check your environment variables.";
const CHAT_FAILURE: &str = "I'm sorry, I'm having trouble processing your request right now. \
     Please check your API key configuration and try again.";
const RUN_CODE_NO_KEY: &str = "Output:\nError\n\nErrors or Warnings:\nAPI key not configured\n\n\
     Explanation:\nThe server's API key is not properly configured. Please contact support.";
const RUN_CODE_FAILURE: &str = "Output:\nExecution error\n\nErrors or Warnings:\nFailed to \
     process code execution\n\nExplanation:\nThe system encountered an error while trying to \
     execute your code. This might be due to invalid syntax or unsupported operations.";

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

// ─── POST /debug ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DebugRequest {
    pub code: Option<String>,
}

pub async fn debug_code(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<DebugRequest>,
) -> Result<Json<Value>, ApiError> {
    let code = match body.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => return Err(bad_request("No code provided")),
    };

    let output = match ctx.gateway.generate(&prompts::debug_analysis(code)).await {
        Ok(text) => text,
        Err(GatewayError::MissingApiKey) => {
            error!("missing Gemini API key");
            DEBUG_NO_KEY.to_string()
        }
        Err(e) => {
            error!(err = %e, "Gemini API error");
            format!("Error connecting to Gemini API. Details: {e}")
        }
    };
    Ok(Json(json!({ "output": output })))
}

// ─── POST /chat ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    let message = match body.message.as_deref().filter(|m| !m.is_empty()) {
        Some(message) => message,
        None => return Err(bad_request("No message provided")),
    };

    let output = match ctx.gateway.generate(&prompts::chat_reply(message)).await {
        Ok(text) => text,
        Err(GatewayError::MissingApiKey) => {
            error!("missing Gemini API key");
            CHAT_NO_KEY.to_string()
        }
        Err(e) => {
            error!(err = %e, "Gemini API error");
            CHAT_FAILURE.to_string()
        }
    };
    Ok(Json(json!({ "output": output })))
}

// ─── POST /run-code ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RunCodeRequest {
    pub code: Option<String>,
    pub language: Option<String>,
}

pub async fn run_code(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<RunCodeRequest>,
) -> Result<Json<Value>, ApiError> {
    let code = match body.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => return Err(bad_request("No code provided")),
    };
    let language = body.language.as_deref().unwrap_or("javascript");

    let output = match ctx
        .gateway
        .generate(&prompts::simulated_execution(code, language))
        .await
    {
        Ok(reply) if prompts::has_execution_sections(&reply) => reply,
        Ok(_) => {
            warn!("model reply missing required section headers");
            RUN_CODE_FAILURE.to_string()
        }
        Err(GatewayError::MissingApiKey) => {
            error!("missing Gemini API key");
            RUN_CODE_NO_KEY.to_string()
        }
        Err(e) => {
            error!(err = %e, "Gemini API error");
            RUN_CODE_FAILURE.to_string()
        }
    };
    Ok(Json(json!({ "output": output })))
}
