use sqlx::SqlitePool;

use super::repo_types::{EnrolledCourse, JoinedActivity};
use crate::error::ApiError;

/// Activities a user has joined, newest first.
pub async fn activities_for_user(
    db: &SqlitePool,
    user_id: i64,
) -> Result<Vec<JoinedActivity>, ApiError> {
    let rows = sqlx::query_as::<_, JoinedActivity>(
        r#"
        SELECT a.id, a.title, a.description, a.schedule, a.capacity,
               ua.joined_at, ua.status
        FROM activities a
        JOIN user_activities ua ON ua.activity_id = a.id
        WHERE ua.user_id = ?1
        ORDER BY ua.joined_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Courses a user is enrolled in, newest first.
pub async fn courses_for_user(
    db: &SqlitePool,
    user_id: i64,
) -> Result<Vec<EnrolledCourse>, ApiError> {
    let rows = sqlx::query_as::<_, EnrolledCourse>(
        r#"
        SELECT c.id, c.title, c.description, c.price,
               uc.enrolled_at, uc.progress, uc.status
        FROM courses c
        JOIN user_courses uc ON uc.course_id = c.id
        WHERE uc.user_id = ?1
        ORDER BY uc.enrolled_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn catalog_is_empty(db: &SqlitePool) -> Result<bool, ApiError> {
    let activities = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activities")
        .fetch_one(db)
        .await?;
    let courses = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
        .fetch_one(db)
        .await?;
    Ok(activities == 0 && courses == 0)
}
