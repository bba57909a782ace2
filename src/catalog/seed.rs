use sqlx::SqlitePool;
use tracing::info;

use super::repo;

const SAMPLE_ACTIVITIES: &[(&str, &str, &str, i64)] = &[
    (
        "Morning Yoga in the Park",
        "Low-impact vinyasa session, mats provided",
        "2024-06-01 07:30",
        20,
    ),
    (
        "City River Cleanup",
        "Volunteer cleanup walk along the north bank",
        "2024-06-08 09:00",
        40,
    ),
    (
        "Board Game Night",
        "Casual evening of strategy and party games",
        "2024-06-14 19:00",
        16,
    ),
];

const SAMPLE_COURSES: &[(&str, &str, f64)] = &[
    (
        "Introduction to Python",
        "Programming from zero: syntax, functions, small scripts",
        49.0,
    ),
    (
        "Web Development Basics",
        "HTML, CSS and the request/response cycle",
        79.0,
    ),
    (
        "Data Analysis with Spreadsheets",
        "Pivot tables, charts and simple statistics",
        59.0,
    ),
];

/// Populates the fixed sample catalog on first run with an empty database.
/// Idempotent: any existing catalog row skips seeding entirely.
pub async fn seed_catalog(db: &SqlitePool) -> anyhow::Result<()> {
    if !repo::catalog_is_empty(db).await? {
        return Ok(());
    }

    let mut tx = db.begin().await?;

    for (title, description, schedule, capacity) in SAMPLE_ACTIVITIES {
        sqlx::query(
            "INSERT INTO activities (title, description, schedule, capacity)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(title)
        .bind(description)
        .bind(schedule)
        .bind(capacity)
        .execute(&mut *tx)
        .await?;
    }

    for (title, description, price) in SAMPLE_COURSES {
        sqlx::query("INSERT INTO courses (title, description, price) VALUES (?1, ?2, ?3)")
            .bind(title)
            .bind(description)
            .bind(price)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(
        activities = SAMPLE_ACTIVITIES.len(),
        courses = SAMPLE_COURSES.len(),
        "sample catalog seeded"
    );
    Ok(())
}
