//! Folder lifecycle operations.
//!
//! `FolderService` is stateless apart from its collaborators:
//! 1. `create` stores a new folder and reports zero flows.
//! 2. `update` renames an existing folder, failing when it is absent.
//! 3. `delete` removes a folder; absent folders are a no-op.
//! 4. `get_one` / `list` read folders and attach a fresh flow count.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use db::pagination::{self, PageQuery, SeekPage};
use db::DbPool;

use crate::store::{FlowCounter, FolderStore, NewFolder, PgFlowCounter, PgFolderStore};
use crate::{CreateOrRenameFolderRequest, Folder, FolderDto, FolderError};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How `list` obtains flow counts for a page of folders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountStrategy {
    /// One count query per folder, all in flight at once.
    #[default]
    FanOut,
    /// One grouped count query per page.
    Batched,
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FanOut => write!(f, "fan-out"),
            Self::Batched => write!(f, "batched"),
        }
    }
}

impl FromStr for CountStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fan-out" => Ok(Self::FanOut),
            "batched" => Ok(Self::Batched),
            other => Err(format!("unknown count strategy: {other}")),
        }
    }
}

/// Tuning knobs for the service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub count_strategy: CountStrategy,
}

// ---------------------------------------------------------------------------
// FolderService
// ---------------------------------------------------------------------------

pub struct FolderService {
    store: Arc<dyn FolderStore>,
    flows: Arc<dyn FlowCounter>,
    config: ServiceConfig,
}

impl FolderService {
    pub fn new(
        store: Arc<dyn FolderStore>,
        flows: Arc<dyn FlowCounter>,
        config: ServiceConfig,
    ) -> Self {
        Self { store, flows, config }
    }

    /// Service backed by the Postgres `folders` and `flows` tables.
    pub fn postgres(pool: DbPool, config: ServiceConfig) -> Self {
        Self::new(
            Arc::new(PgFolderStore::new(pool.clone())),
            Arc::new(PgFlowCounter::new(pool)),
            config,
        )
    }

    /// Remove a folder. Succeeds whether or not the folder existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, project_id: Uuid, folder_id: Uuid) -> Result<(), FolderError> {
        let removed = self.store.delete(project_id, folder_id).await?;
        info!(removed, "folder delete");
        Ok(())
    }

    /// Rename a folder.
    ///
    /// # Errors
    /// [`FolderError::EntityNotFound`] if the folder is not in the project,
    /// including when it disappears between the write and the re-read.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
        request: CreateOrRenameFolderRequest,
    ) -> Result<Folder, FolderError> {
        if self.store.find_one(project_id, folder_id).await?.is_none() {
            return Err(FolderError::folder_not_found(folder_id));
        }

        self.store
            .update_display_name(project_id, folder_id, &request.display_name)
            .await?;

        let folder = self
            .store
            .find_one(project_id, folder_id)
            .await?
            .ok_or_else(|| FolderError::folder_not_found(folder_id))?;

        info!("folder renamed");
        Ok(folder)
    }

    /// Create a folder with a server-generated id.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        project_id: Uuid,
        request: CreateOrRenameFolderRequest,
    ) -> Result<FolderDto, FolderError> {
        let folder = self
            .store
            .insert(NewFolder {
                id: Uuid::new_v4(),
                project_id,
                display_name: request.display_name,
            })
            .await?;

        info!(folder_id = %folder.id, "folder created");

        // A folder that was just created cannot hold any flows yet.
        Ok(FolderDto::new(folder, 0))
    }

    /// One page of the project's folders with their flow counts.
    ///
    /// `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        project_id: Uuid,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<SeekPage<FolderDto>, FolderError> {
        let decoded = pagination::decode_cursor(cursor)?;
        let query = PageQuery::new(limit.clamp(1, MAX_PAGE_LIMIT), &decoded)?;

        let page = self.store.paginate(project_id, &query).await?;
        let counts = self.count_flows(project_id, &page.data).await?;

        debug!(
            folders = page.data.len(),
            strategy = %self.config.count_strategy,
            "folder page fetched"
        );

        let dtos = page
            .data
            .into_iter()
            .zip(counts)
            .map(|(folder, number_of_flows)| FolderDto::new(folder, number_of_flows))
            .collect();

        Ok(pagination::create_page(dtos, page.cursor))
    }

    /// A single folder, or `None` if it is not in the project.
    #[instrument(skip(self))]
    pub async fn get_one(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
    ) -> Result<Option<FolderDto>, FolderError> {
        let Some(folder) = self.store.find_one(project_id, folder_id).await? else {
            return Ok(None);
        };

        let number_of_flows = self.flows.count(project_id, folder_id).await?;
        Ok(Some(FolderDto::new(folder, number_of_flows)))
    }

    // -----------------------------------------------------------------------
    // Internal: flow counts aligned with `folders` by index.
    // -----------------------------------------------------------------------

    async fn count_flows(
        &self,
        project_id: Uuid,
        folders: &[Folder],
    ) -> Result<Vec<u64>, FolderError> {
        match self.config.count_strategy {
            CountStrategy::FanOut => {
                try_join_all(folders.iter().map(|f| self.flows.count(project_id, f.id))).await
            }
            CountStrategy::Batched => {
                let ids: Vec<Uuid> = folders.iter().map(|f| f.id).collect();
                let by_folder = self.flows.count_by_folders(project_id, &ids).await?;
                Ok(ids
                    .iter()
                    .map(|id| by_folder.get(id).copied().unwrap_or(0))
                    .collect())
            }
        }
    }
}
