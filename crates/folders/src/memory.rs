//! `InMemoryStore` — a test double for `FolderStore` and `FlowCounter`.
//!
//! Mirrors the Postgres behaviour that the service relies on: project
//! scoping, unique display names per project, `(created, id)` keyset order,
//! and flows losing their folder when the folder is deleted.  It also
//! records how many count calls it served so tests can tell the fan-out and
//! batched strategies apart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use db::pagination::{self, PageQuery, PaginationResult, Position, Seek};
use db::DbError;

use crate::store::{FlowCounter, FolderStore, NewFolder};
use crate::{Folder, FolderError};

/// Name of the unique index the migrations put on `(project_id, display_name)`.
const DISPLAY_NAME_INDEX: &str = "idx_folders_project_id_display_name";

#[derive(Debug, Clone)]
struct FlowRecord {
    project_id: Uuid,
    folder_id: Option<Uuid>,
}

/// Folders and flows held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    folders: Mutex<Vec<Folder>>,
    flows: Mutex<Vec<FlowRecord>>,
    count_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flow in `folder_id` (or in no folder).
    pub fn add_flow(&self, project_id: Uuid, folder_id: Option<Uuid>) {
        self.flows.lock().unwrap().push(FlowRecord { project_id, folder_id });
    }

    /// Number of single-folder count queries served.
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Number of grouped count queries served.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Total folders across all projects.
    pub fn folder_count(&self) -> usize {
        self.folders.lock().unwrap().len()
    }

    /// Creation timestamps are kept at microsecond precision, like Postgres,
    /// and strictly increasing so insertion order is also list order.
    fn next_created(folders: &[Folder]) -> DateTime<Utc> {
        let now = Utc::now();
        let now = DateTime::<Utc>::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now);
        match folders.iter().map(|f| f.created).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        }
    }

    /// Fails like the unique index when another folder in the project
    /// already carries `display_name`.
    fn ensure_name_free(
        folders: &[Folder],
        project_id: Uuid,
        display_name: &str,
        except: Option<Uuid>,
    ) -> Result<(), FolderError> {
        let taken = folders.iter().any(|f| {
            f.project_id == project_id && f.display_name == display_name && Some(f.id) != except
        });
        if taken {
            return Err(DbError::unique_violation(DISPLAY_NAME_INDEX).into());
        }
        Ok(())
    }

    fn count_in(&self, project_id: Uuid, folder_id: Uuid) -> u64 {
        self.flows
            .lock()
            .unwrap()
            .iter()
            .filter(|flow| flow.project_id == project_id && flow.folder_id == Some(folder_id))
            .count() as u64
    }
}

#[async_trait]
impl FolderStore for InMemoryStore {
    async fn find_one(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
    ) -> Result<Option<Folder>, FolderError> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.project_id == project_id && f.id == folder_id)
            .cloned())
    }

    async fn insert(&self, folder: NewFolder) -> Result<Folder, FolderError> {
        let mut folders = self.folders.lock().unwrap();
        Self::ensure_name_free(&folders, folder.project_id, &folder.display_name, None)?;
        let created = Self::next_created(&folders);
        let folder = Folder {
            id: folder.id,
            created,
            updated: created,
            project_id: folder.project_id,
            display_name: folder.display_name,
        };
        folders.push(folder.clone());
        Ok(folder)
    }

    async fn update_display_name(
        &self,
        project_id: Uuid,
        folder_id: Uuid,
        display_name: &str,
    ) -> Result<(), FolderError> {
        let mut folders = self.folders.lock().unwrap();
        Self::ensure_name_free(&folders, project_id, display_name, Some(folder_id))?;
        if let Some(folder) = folders
            .iter_mut()
            .find(|f| f.project_id == project_id && f.id == folder_id)
        {
            folder.display_name = display_name.to_owned();
            folder.updated = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError> {
        let removed = {
            let mut folders = self.folders.lock().unwrap();
            let before = folders.len();
            folders.retain(|f| !(f.project_id == project_id && f.id == folder_id));
            (before - folders.len()) as u64
        };

        if removed > 0 {
            for flow in self.flows.lock().unwrap().iter_mut() {
                if flow.folder_id == Some(folder_id) {
                    flow.folder_id = None;
                }
            }
        }

        Ok(removed)
    }

    async fn paginate(
        &self,
        project_id: Uuid,
        query: &PageQuery,
    ) -> Result<PaginationResult<Folder>, FolderError> {
        let position = |f: &Folder| Position::new(f.created, f.id);

        let mut rows: Vec<Folder> = self
            .folders
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect();
        rows.sort_by_key(position);

        let fetch = query.limit as usize + 1;
        let rows: Vec<Folder> = match query.seek {
            Seek::First => rows.into_iter().take(fetch).collect(),
            Seek::After(after) => rows
                .into_iter()
                .filter(|f| position(f) > after)
                .take(fetch)
                .collect(),
            Seek::Before(before) => rows
                .into_iter()
                .rev()
                .filter(|f| position(f) < before)
                .take(fetch)
                .collect(),
        };

        Ok(pagination::finish_page(rows, query, position))
    }
}

#[async_trait]
impl FlowCounter for InMemoryStore {
    async fn count(&self, project_id: Uuid, folder_id: Uuid) -> Result<u64, FolderError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.count_in(project_id, folder_id))
    }

    async fn count_by_folders(
        &self,
        project_id: Uuid,
        folder_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, FolderError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(folder_ids
            .iter()
            .map(|&id| (id, self.count_in(project_id, id)))
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}
