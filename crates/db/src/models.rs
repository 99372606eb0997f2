//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types live in the `folders` crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// folders
// ---------------------------------------------------------------------------

/// A persisted folder row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// flows
// ---------------------------------------------------------------------------

/// One group of `SELECT folder_id, COUNT(*) … GROUP BY folder_id`.
#[derive(Debug, Clone, FromRow)]
pub struct FlowCountRow {
    pub folder_id: Uuid,
    pub count: i64,
}
