// rest/routes/projects.rs — Project store routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::project::model::{CreateProjectParams, NewMessage, Project, UpdateProjectParams};
use crate::project::StoreError;
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::ProjectNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Project not found" })),
        ),
        StoreError::Db(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

pub async fn list_projects(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    // Unreadable stored data is treated as "no projects" — listing never fails.
    let projects: Vec<Project> = match ctx.projects.list(&user_id).await {
        Ok(projects) => projects,
        Err(e) => {
            warn!(user_id = %user_id, err = %e, "project listing failed — returning empty");
            Vec::new()
        }
    };
    Json(json!({ "projects": projects }))
}

pub async fn create_project(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
    Json(params): Json<CreateProjectParams>,
) -> Result<Json<Project>, ApiError> {
    let project = ctx
        .projects
        .create(&user_id, params)
        .await
        .map_err(store_error)?;
    Ok(Json(project))
}

pub async fn get_project(
    State(ctx): State<Arc<AppContext>>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<Project>, ApiError> {
    match ctx.projects.get(&user_id, &id).await.map_err(store_error)? {
        Some(project) => Ok(Json(project)),
        None => Err(store_error(StoreError::ProjectNotFound(id))),
    }
}

pub async fn update_project(
    State(ctx): State<Arc<AppContext>>,
    Path((user_id, id)): Path<(String, String)>,
    Json(params): Json<UpdateProjectParams>,
) -> Result<Json<Project>, ApiError> {
    let project = ctx
        .projects
        .update(&user_id, &id, params)
        .await
        .map_err(store_error)?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(ctx): State<Arc<AppContext>>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    ctx.projects
        .delete(&user_id, &id)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn append_message(
    State(ctx): State<Arc<AppContext>>,
    Path((user_id, id)): Path<(String, String)>,
    Json(message): Json<NewMessage>,
) -> Result<Json<Project>, ApiError> {
    let project = ctx
        .projects
        .append_message(&user_id, &id, message)
        .await
        .map_err(store_error)?;
    Ok(Json(project))
}

// ─── Active project pointer ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetActiveProjectRequest {
    #[serde(rename = "projectId")]
    pub project_id: String,
}

pub async fn get_active_project(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let active = ctx
        .projects
        .active_project(&user_id)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "projectId": active })))
}

pub async fn set_active_project(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
    Json(body): Json<SetActiveProjectRequest>,
) -> Result<Json<Value>, ApiError> {
    ctx.projects
        .set_active_project(&user_id, &body.project_id)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "projectId": body.project_id })))
}
