use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub handle: String, // unique login handle, username or email
    #[serde(skip_serializing)]
    pub password_digest: String, // PBKDF2 PHC string, never exposed in JSON
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: OffsetDateTime,
}
