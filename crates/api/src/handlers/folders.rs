use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use ::folders::service::DEFAULT_PAGE_LIMIT;
use ::folders::{CreateOrRenameFolderRequest, Folder, FolderDto, FolderError};
use db::SeekPage;

use super::AppState;
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListFoldersQuery {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

pub async fn list(
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListFoldersQuery>,
    State(state): State<AppState>,
) -> Result<Json<SeekPage<FolderDto>>, ApiError> {
    let page = state
        .folders
        .list(
            project_id,
            query.cursor.as_deref(),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
        .await?;
    Ok(Json(page))
}

pub async fn get(
    Path((project_id, folder_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<Json<FolderDto>, ApiError> {
    match state.folders.get_one(project_id, folder_id).await? {
        Some(folder) => Ok(Json(folder)),
        None => Err(FolderError::folder_not_found(folder_id).into()),
    }
}

pub async fn create(
    Path(project_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<CreateOrRenameFolderRequest>,
) -> Result<(StatusCode, Json<FolderDto>), ApiError> {
    let folder = state.folders.create(project_id, payload).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn update(
    Path((project_id, folder_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Json(payload): Json<CreateOrRenameFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    let folder = state.folders.update(project_id, folder_id, payload).await?;
    Ok(Json(folder))
}

pub async fn delete(
    Path((project_id, folder_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.folders.delete(project_id, folder_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
