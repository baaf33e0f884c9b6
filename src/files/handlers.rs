//! File upload and listing handlers

use axum::extract::{Extension, Multipart};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{FileOwner, FileRecord, FileWithOwner};
use super::validators::{is_allowed_file_type, MAX_FILE_SIZE};
use crate::auth::models::Role;
use crate::auth::AuthedUser;
use crate::common::{generate_id, ApiError, AppState, EntityPrefix};

/// POST /api/v1/files/upload
/// Multipart upload, field name `file`. Responds 201 with the record and
/// its owner projection.
pub async fn upload(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileWithOwner>), ApiError> {
    let state = state_lock.read().await.clone();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart payload".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

        let uploaded =
            store_upload(&state, &authed, &original_name, &mime_type, data.to_vec()).await?;
        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

/// Validates, records, and ships an upload to the object store. Rejections
/// happen before the record insert and before any store call.
pub async fn store_upload(
    state: &AppState,
    authed: &AuthedUser,
    original_name: &str,
    mime_type: &str,
    data: Vec<u8>,
) -> Result<FileWithOwner, ApiError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ApiError::BadRequest(
            "File size exceeds 10MB limit".to_string(),
        ));
    }

    if !is_allowed_file_type(mime_type) {
        return Err(ApiError::BadRequest(format!(
            "File type {} is not allowed. Supported types: images (image/*), audio (audio/*), video (video/*), and common documents (PDF, DOC, DOCX, XLS, XLSX, PPT, PPTX, TXT, RTF).",
            mime_type
        )));
    }

    let id = generate_id(EntityPrefix::File);
    let size = data.len() as i64;

    sqlx::query(
        "INSERT INTO files (id, user_id, original_name, mime_type, size) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&authed.id)
    .bind(original_name)
    .bind(mime_type)
    .bind(size)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    // Object keys reuse the record id plus the original extension
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let key = format!("uploads/{}{}", id, extension);

    state.storage.put(&key, data, mime_type).await.map_err(|e| {
        warn!(error = %e, file_id = %id, key = %key, "Object store upload failed");
        ApiError::Upstream("Failed to store uploaded file".to_string())
    })?;

    let file = fetch_file(&state.db, &id).await?;
    let user = fetch_owner(&state.db, &authed.id).await?;

    info!(file_id = %file.id, user_id = %authed.id, size = size, "File uploaded");
    Ok(FileWithOwner { file, user })
}

async fn fetch_file(pool: &SqlitePool, id: &str) -> Result<FileRecord, ApiError> {
    sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

async fn fetch_owner(pool: &SqlitePool, user_id: &str) -> Result<FileOwner, ApiError> {
    sqlx::query_as::<_, FileOwner>(
        "SELECT id, email, first_name, last_name, picture, role, provider FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(ApiError::DatabaseError)?
    .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}

/// GET /api/v1/files/me
/// The caller's uploads, newest first.
pub async fn my_files(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<FileRecord>>, ApiError> {
    let state = state_lock.read().await.clone();

    let files = sqlx::query_as::<_, FileRecord>(
        "SELECT * FROM files WHERE user_id = ? ORDER BY upload_time DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(files))
}

/// Flat row shape of the files/users join used by the admin listing.
#[derive(sqlx::FromRow)]
struct FileOwnerRow {
    id: String,
    user_id: String,
    original_name: String,
    mime_type: String,
    size: i64,
    upload_time: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    owner_email: String,
    owner_first_name: Option<String>,
    owner_last_name: Option<String>,
    owner_picture: Option<String>,
    owner_role: Role,
    owner_provider: Option<String>,
}

/// GET /api/v1/files/all
/// Every upload with its owner, newest first. The ADMIN gate lives in the
/// route middleware.
pub async fn all_files(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<FileWithOwner>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows = sqlx::query_as::<_, FileOwnerRow>(
        r#"
        SELECT f.id, f.user_id, f.original_name, f.mime_type, f.size,
               f.upload_time, f.created_at, f.updated_at,
               u.email AS owner_email, u.first_name AS owner_first_name,
               u.last_name AS owner_last_name, u.picture AS owner_picture,
               u.role AS owner_role, u.provider AS owner_provider
        FROM files f
        JOIN users u ON u.id = f.user_id
        ORDER BY f.upload_time DESC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let files = rows
        .into_iter()
        .map(|row| FileWithOwner {
            user: FileOwner {
                id: row.user_id.clone(),
                email: row.owner_email,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                picture: row.owner_picture,
                role: row.owner_role,
                provider: row.owner_provider,
            },
            file: FileRecord {
                id: row.id,
                user_id: row.user_id,
                original_name: row.original_name,
                mime_type: row.mime_type,
                size: row.size,
                upload_time: row.upload_time,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
        .collect();

    Ok(Json(files))
}
