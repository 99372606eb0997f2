//! Collaborator seams for [`FolderService`](crate::FolderService).
//!
//! `FolderStore` persists folders, `FlowCounter` answers "how many flows live
//! in this folder".  The Postgres implementations delegate to the `db`
//! crate's repository functions; [`crate::memory`] provides an in-process
//! double for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use uuid::Uuid;

use db::pagination::{PageQuery, PaginationResult};
use db::repository::{flows as flow_repo, folders as folder_repo};
use db::DbPool;

use crate::{Folder, FolderError};

/// Fields supplied when a folder is first stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    pub id: Uuid,
    pub project_id: Uuid,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Persistence for folder records. Every call is scoped by project.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn find_one(&self, project_id: Uuid, folder_id: Uuid)
        -> Result<Option<Folder>, FolderError>;

    async fn insert(&self, folder: NewFolder) -> Result<Folder, FolderError>;

    async fn update_display_name(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
        display_name: &str,
    ) -> Result<(), FolderError>;

    /// Returns the number of rows removed; `0` is not an error.
    async fn delete(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError>;

    /// One page of the project's folders, ascending by `(created, id)`.
    async fn paginate(
        &self,
        project_id: Uuid,
        query: &PageQuery,
    ) -> Result<PaginationResult<Folder>, FolderError>;
}

/// Counts flows per folder.
#[async_trait]
pub trait FlowCounter: Send + Sync {
    async fn count(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError>;

    /// Counts for several folders at once, keyed by folder id.
    ///
    /// The default issues one [`FlowCounter::count`] per folder concurrently.
    /// Implementations backed by a database should override this with a
    /// single grouped query.
    async fn count_by_folders(
        &self,
        project_id: Uuid,
        folder_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, FolderError> {
        let counts =
            try_join_all(folder_ids.iter().map(|&folder_id| self.count(project_id, folder_id)))
                .await?;
        Ok(folder_ids.iter().copied().zip(counts).collect())
    }
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`FolderStore`] over the `folders` table.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: DbPool,
}

impl PgFolderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn find_one(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
    ) -> Result<Option<Folder>, FolderError> {
        let row = folder_repo::find_folder(&self.pool, project_id, folder_id).await?;
        Ok(row.map(Folder::from))
    }

    async fn insert(&self, folder: NewFolder) -> Result<Folder, FolderError> {
        let row = folder_repo::insert_folder(
            &self.pool,
            folder.id,
            folder.project_id,
            &folder.display_name,
        )
        .await?;
        Ok(row.into())
    }

    async fn update_display_name(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
        display_name: &str,
    ) -> Result<(), FolderError> {
        folder_repo::update_display_name(&self.pool, project_id, folder_id, display_name).await?;
        Ok(())
    }

    async fn delete(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError> {
        Ok(folder_repo::delete_folder(&self.pool, project_id, folder_id).await?)
    }

    async fn paginate(
        &self,
        project_id: Uuid,
        query: &PageQuery,
    ) -> Result<PaginationResult<Folder>, FolderError> {
        let page = folder_repo::paginate_folders(&self.pool, project_id, query).await?;
        Ok(PaginationResult {
            data: page.data.into_iter().map(Folder::from).collect(),
            cursor: page.cursor,
        })
    }
}

/// [`FlowCounter`] over the `flows` table.
#[derive(Debug, Clone)]
pub struct PgFlowCounter {
    pool: DbPool,
}

impl PgFlowCounter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlowCounter for PgFlowCounter {
    async fn count(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError> {
        let count = flow_repo::count_flows(&self.pool, project_id, folder_id).await?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_folders(
        &self,
        project_id: Uuid,
        folder_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, FolderError> {
        let rows = flow_repo::count_flows_by_folder(&self.pool, project_id, folder_ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.folder_id, row.count.max(0) as u64))
            .collect())
    }
}
