//! Route handlers and the state they share.

use std::sync::Arc;

use ::folders::FolderService;

pub mod folders;

#[derive(Clone)]
pub struct AppState {
    pub folders: Arc<FolderService>,
}
