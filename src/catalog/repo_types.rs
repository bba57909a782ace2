use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Per-user activity participation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActivityStatus {
    Registered,
    Attended,
    Cancelled,
}

/// Per-user course enrollment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    Enrolled,
    Completed,
    Dropped,
}

/// Catalog activity row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub schedule: String,
    pub capacity: i64,
}

/// Catalog course row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
}

/// An activity a user has joined, with the join-row fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JoinedActivity {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub schedule: String,
    pub capacity: i64,
    pub joined_at: OffsetDateTime,
    pub status: ActivityStatus,
}

/// A course a user is enrolled in, with the join-row fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrolledCourse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub enrolled_at: OffsetDateTime,
    pub progress: i64, // 0-100
    pub status: CourseStatus,
}
