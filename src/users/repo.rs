use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::dto::ProfileUpdate;
use super::repo_types::User;
use crate::error::ApiError;

/// Find a user by login handle.
pub async fn find_by_handle(db: &SqlitePool, handle: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, handle, password_digest, email, full_name, phone, created_at
        FROM users
        WHERE handle = ?1
        "#,
    )
    .bind(handle)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Find a user by id.
pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, handle, password_digest, email, full_name, phone, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Create a new user with a hashed password digest.
///
/// The duplicate check is an application-level lookup inside the insert
/// transaction. Two concurrent registrations of the same handle can both
/// pass it; the UNIQUE constraint on `handle` then fails the loser's commit,
/// which surfaces as a persistence failure rather than a duplicate row.
pub async fn create(db: &SqlitePool, handle: &str, digest: &str) -> Result<User, ApiError> {
    let mut tx = db.begin().await?;

    let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE handle = ?1")
        .bind(handle)
        .fetch_one(&mut *tx)
        .await?;
    if taken > 0 {
        return Err(ApiError::DuplicateHandle);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (handle, password_digest, created_at)
        VALUES (?1, ?2, ?3)
        RETURNING id, handle, password_digest, email, full_name, phone, created_at
        "#,
    )
    .bind(handle)
    .bind(digest)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(user)
}

/// Apply a partial profile update transactionally.
pub async fn update_profile(
    db: &SqlitePool,
    id: i64,
    fields: &ProfileUpdate,
) -> Result<User, ApiError> {
    let mut tx = db.begin().await?;

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email = COALESCE(?2, email),
            full_name = COALESCE(?3, full_name),
            phone = COALESCE(?4, phone)
        WHERE id = ?1
        RETURNING id, handle, password_digest, email, full_name, phone, created_at
        "#,
    )
    .bind(id)
    .bind(fields.email.as_deref())
    .bind(fields.full_name.as_deref())
    .bind(fields.phone.as_deref())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound)?;

    tx.commit().await?;
    Ok(updated)
}
