//! Folder service error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by [`FolderService`](crate::FolderService).
///
/// Only `update` reports a missing folder as an error; `get_one` answers
/// `None` and `delete` succeeds regardless.
#[derive(Debug, Error)]
pub enum FolderError {
    /// The folder does not exist in the given project.
    #[error("{message}")]
    EntityNotFound { message: String },

    /// The pagination cursor could not be decoded.
    #[error(transparent)]
    InvalidCursor(#[from] db::PaginationError),

    /// Persistence error from the db crate.
    #[error("database error: {0}")]
    Database(#[from] db::DbError),
}

impl FolderError {
    pub fn folder_not_found(folder_id: Uuid) -> Self {
        Self::EntityNotFound {
            message: format!("Folder {folder_id} is not found"),
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Self::InvalidCursor(_) => "VALIDATION",
            Self::Database(err) if err.is_unique_violation() => "DUPLICATE_NAME",
            Self::Database(_) => "INTERNAL",
        }
    }
}
