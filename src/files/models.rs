//! File bookkeeping models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::models::Role;

/// Upload bookkeeping row. The bytes live in the object store; this record
/// carries the metadata and ownership.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub user_id: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub upload_time: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Owner projection nested in upload and admin listing responses.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileOwner {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub picture: Option<String>,
    pub role: Role,
    pub provider: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FileWithOwner {
    #[serde(flatten)]
    pub file: FileRecord,
    pub user: FileOwner,
}
