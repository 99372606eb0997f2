//! `folders` crate — folder domain models, collaborator traits, and the
//! `FolderService` that ties them together.

pub mod models;
pub mod error;
pub mod store;
pub mod service;
pub mod memory;

pub use models::{CreateOrRenameFolderRequest, Folder, FolderDto};
pub use error::FolderError;
pub use store::{FlowCounter, FolderStore, NewFolder, PgFlowCounter, PgFolderStore};
pub use service::{CountStrategy, FolderService, ServiceConfig};
