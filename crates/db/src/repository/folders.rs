//! Folder CRUD operations.
//!
//! Every statement is scoped by `project_id` so a folder id leaked from one
//! project can never be read or mutated through another.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::FolderRow,
    pagination::{self, PageQuery, PaginationResult, Seek},
};

const FOLDER_COLUMNS: &str = "id, project_id, display_name, created, updated";

/// Insert a new folder and return the stored row.
pub async fn insert_folder(
    pool: &PgPool,
    id: Uuid,
    project_id: Uuid,
    display_name: &str,
) -> Result<FolderRow, DbError> {
    let now = Utc::now();

    let row = sqlx::query_as::<_, FolderRow>(
        r#"
        INSERT INTO folders (id, project_id, display_name, created, updated)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, project_id, display_name, created, updated
        "#,
    )
    .bind(id)
    .bind(project_id)
    .bind(display_name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a single folder by project and primary key.
pub async fn find_folder(
    pool: &PgPool,
    project_id: Uuid,
    id: Uuid,
) -> Result<Option<FolderRow>, DbError> {
    let row = sqlx::query_as::<_, FolderRow>(&format!(
        "SELECT {FOLDER_COLUMNS} FROM folders WHERE project_id = $1 AND id = $2"
    ))
    .bind(project_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Rename a folder and bump its `updated` timestamp.
///
/// Returns the number of rows touched (0 when the folder does not exist).
pub async fn update_display_name(
    pool: &PgPool,
    project_id: Uuid,
    id: Uuid,
    display_name: &str,
) -> Result<u64, DbError> {
    let result = sqlx::query(
        r#"
        UPDATE folders
        SET display_name = $1, updated = $2
        WHERE project_id = $3 AND id = $4
        "#,
    )
    .bind(display_name)
    .bind(Utc::now())
    .bind(project_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Permanently delete a folder.
///
/// Deleting a folder that does not exist is not an error; the caller gets
/// `0` back.
pub async fn delete_folder(pool: &PgPool, project_id: Uuid, id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM folders WHERE project_id = $1 AND id = $2")
        .bind(project_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Fetch one keyset page of a project's folders ordered by `(created, id)`.
pub async fn paginate_folders(
    pool: &PgPool,
    project_id: Uuid,
    query: &PageQuery,
) -> Result<PaginationResult<FolderRow>, DbError> {
    // One extra row tells us whether another page exists.
    let fetch = i64::from(query.limit) + 1;

    let rows = match &query.seek {
        Seek::First => {
            sqlx::query_as::<_, FolderRow>(&format!(
                r#"
                SELECT {FOLDER_COLUMNS} FROM folders
                WHERE project_id = $1
                ORDER BY created ASC, id ASC
                LIMIT $2
                "#
            ))
            .bind(project_id)
            .bind(fetch)
            .fetch_all(pool)
            .await?
        }
        Seek::After(position) => {
            sqlx::query_as::<_, FolderRow>(&format!(
                r#"
                SELECT {FOLDER_COLUMNS} FROM folders
                WHERE project_id = $1 AND (created, id) > ($2, $3)
                ORDER BY created ASC, id ASC
                LIMIT $4
                "#
            ))
            .bind(project_id)
            .bind(position.created)
            .bind(position.id)
            .bind(fetch)
            .fetch_all(pool)
            .await?
        }
        Seek::Before(position) => {
            sqlx::query_as::<_, FolderRow>(&format!(
                r#"
                SELECT {FOLDER_COLUMNS} FROM folders
                WHERE project_id = $1 AND (created, id) < ($2, $3)
                ORDER BY created DESC, id DESC
                LIMIT $4
                "#
            ))
            .bind(project_id)
            .bind(position.created)
            .bind(position.id)
            .bind(fetch)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(pagination::finish_page(rows, query, |row| {
        pagination::Position::new(row.created, row.id)
    }))
}
