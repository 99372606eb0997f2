//! Read-only queries against the `flows` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbError, models::FlowCountRow};

/// Number of flows in `folder_id`.
pub async fn count_flows(pool: &PgPool, project_id: Uuid, folder_id: Uuid) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM flows WHERE project_id = $1 AND folder_id = $2",
    )
    .bind(project_id)
    .bind(folder_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Flow counts for many folders in one round trip.
///
/// Folders without flows produce no row.
pub async fn count_flows_by_folder(
    pool: &PgPool,
    project_id: Uuid,
    folder_ids: &[Uuid],
) -> Result<Vec<FlowCountRow>, DbError> {
    if folder_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, FlowCountRow>(
        r#"
        SELECT folder_id, COUNT(*) AS count
        FROM flows
        WHERE project_id = $1 AND folder_id = ANY($2)
        GROUP BY folder_id
        "#,
    )
    .bind(project_id)
    .bind(folder_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
