// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, local only unless bound elsewhere via FIXSTER_BIND.
// The gateway endpoints keep the paths the browser UI calls; the project
// store is served under the versioned API prefix.
//
// Endpoints:
//   POST /debug
//   POST /chat
//   POST /run-code
//   POST /support
//   GET  /health
//   GET|POST   /api/v1/history
//   GET|POST   /api/v1/users/{user_id}/projects
//   GET|PATCH|DELETE /api/v1/users/{user_id}/projects/{id}
//   POST /api/v1/users/{user_id}/projects/{id}/messages
//   GET|PUT    /api/v1/users/{user_id}/active-project

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // AI gateway
        .route("/debug", post(routes::ai::debug_code))
        .route("/chat", post(routes::ai::chat))
        .route("/run-code", post(routes::ai::run_code))
        // Support
        .route("/support", post(routes::support::send_support))
        // Recently analyzed snippets
        .route(
            "/api/v1/history",
            get(routes::history::list_history).post(routes::history::push_history),
        )
        // Projects
        .route(
            "/api/v1/users/{user_id}/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/v1/users/{user_id}/projects/{id}",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/v1/users/{user_id}/projects/{id}/messages",
            post(routes::projects::append_message),
        )
        .route(
            "/api/v1/users/{user_id}/active-project",
            get(routes::projects::get_active_project).put(routes::projects::set_active_project),
        )
        // The browser UI is served from another origin.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
