//! Repository for the `achievements` table.

use archive_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::{Achievement, CreateAchievement, UpdateAchievement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, image_filename, created_at, updated_at";

/// Provides CRUD operations for achievements.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Insert a new achievement, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAchievement,
    ) -> Result<Achievement, sqlx::Error> {
        let query = format!(
            "INSERT INTO achievements (title, description, image_filename)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_filename)
            .fetch_one(pool)
            .await
    }

    /// Find an achievement by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements WHERE id = $1");
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all achievements, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM achievements ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Achievement>(&query).fetch_all(pool).await
    }

    /// Update an achievement. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAchievement,
    ) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!(
            "UPDATE achievements SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_filename = COALESCE($4, image_filename)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_filename)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an achievement, returning the removed row or `None`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!("DELETE FROM achievements WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of achievements.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
            .fetch_one(pool)
            .await
    }
}
