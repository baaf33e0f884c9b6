//! User directory: find-or-create semantics keyed by email, role mutation.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::models::{NewUser, Role, User};
use crate::common::{generate_id, safe_email_log, ApiError, EntityPrefix};

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::DatabaseError)
}

/// Insert a fresh record with a generated id and the default USER role.
/// Fails on the email uniqueness constraint if the address is taken.
pub async fn create(pool: &SqlitePool, profile: &NewUser) -> Result<User, ApiError> {
    let id = generate_id(EntityPrefix::User);

    sqlx::query(
        "INSERT INTO users (id, email, first_name, last_name, picture, role, provider) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&profile.email)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.picture)
    .bind(Role::User)
    .bind(&profile.provider)
    .execute(pool)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %id,
        email = %safe_email_log(&profile.email),
        provider = %profile.provider,
        "Created new user account"
    );

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("user record missing after insert".to_string()))
}

/// Resolve the record for `profile.email`, creating it on first login.
///
/// Two concurrent first logins can both miss the lookup and race on the
/// email uniqueness constraint; the loser re-reads the winner's row instead
/// of surfacing the constraint error to the client.
pub async fn find_or_create(pool: &SqlitePool, profile: &NewUser) -> Result<User, ApiError> {
    if let Some(existing) = find_by_email(pool, &profile.email).await? {
        debug!(user_id = %existing.id, "Found existing user in directory");
        return Ok(existing);
    }

    match create(pool, profile).await {
        Ok(user) => Ok(user),
        Err(e) if is_unique_violation(&e) => {
            warn!(
                email = %safe_email_log(&profile.email),
                "Lost concurrent-create race on email, re-reading existing record"
            );
            find_by_email(pool, &profile.email).await?.ok_or_else(|| {
                ApiError::InternalServer("user record missing after constraint conflict".to_string())
            })
        }
        Err(e) => Err(e),
    }
}

/// Set role to ADMIN and bump `updated_at`. Idempotent: promoting an admin
/// leaves the record an admin.
pub async fn promote_to_admin(pool: &SqlitePool, id: &str) -> Result<User, ApiError> {
    let result = sqlx::query("UPDATE users SET role = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(Role::Admin)
        .bind(id)
        .execute(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("user not found".to_string()));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
}

fn is_unique_violation(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::DatabaseError(e)
            if e.as_database_error().map_or(false, |d| d.is_unique_violation())
    )
}
