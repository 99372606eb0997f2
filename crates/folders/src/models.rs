//! Folder domain models and request/response shapes.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::FolderRow;

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

/// A named grouping of flows inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub project_id: Uuid,
    pub display_name: String,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            created: row.created,
            updated: row.updated,
            project_id: row.project_id,
            display_name: row.display_name,
        }
    }
}

// ---------------------------------------------------------------------------
// FolderDto
// ---------------------------------------------------------------------------

/// A folder as returned to clients, with its flow count computed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDto {
    #[serde(flatten)]
    pub folder: Folder,
    pub number_of_flows: u64,
}

impl FolderDto {
    pub fn new(folder: Folder, number_of_flows: u64) -> Self {
        Self { folder, number_of_flows }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of both "create folder" and "rename folder".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrRenameFolderRequest {
    pub display_name: String,
}

impl CreateOrRenameFolderRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self { display_name: display_name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dto_serialises_flat_camel_case() {
        let id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let now = Utc::now();
        let dto = FolderDto::new(
            Folder {
                id,
                created: now,
                updated: now,
                project_id,
                display_name: "Marketing".into(),
            },
            3,
        );

        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["projectId"], json!(project_id.to_string()));
        assert_eq!(value["displayName"], "Marketing");
        assert_eq!(value["numberOfFlows"], 3);
        assert!(value.get("folder").is_none());
    }

    #[test]
    fn request_reads_display_name() {
        let request: CreateOrRenameFolderRequest =
            serde_json::from_value(json!({ "displayName": "Ops" })).unwrap();
        assert_eq!(request, CreateOrRenameFolderRequest::new("Ops"));
    }
}
