//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET    /health
//!   GET    /v1/projects/{project_id}/folders
//!   POST   /v1/projects/{project_id}/folders
//!   GET    /v1/projects/{project_id}/folders/{folder_id}
//!   POST   /v1/projects/{project_id}/folders/{folder_id}
//!   DELETE /v1/projects/{project_id}/folders/{folder_id}

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use folders::FolderService;

pub use error::ApiError;
pub use handlers::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/v1/projects/:project_id/folders",
            get(handlers::folders::list).post(handlers::folders::create),
        )
        .route(
            "/v1/projects/:project_id/folders/:folder_id",
            get(handlers::folders::get)
                .post(handlers::folders::update)
                .delete(handlers::folders::delete),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, folders: FolderService) -> std::io::Result<()> {
    let state = AppState { folders: Arc::new(folders) };
    let listener = TcpListener::bind(addr).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
