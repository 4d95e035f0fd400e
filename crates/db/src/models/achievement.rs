//! Achievement entity model and DTOs.

use archive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An achievement row from the `achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_filename: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new achievement.
#[derive(Debug, Clone)]
pub struct CreateAchievement {
    pub title: String,
    pub description: Option<String>,
    pub image_filename: Option<String>,
}

/// DTO for patching an achievement. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAchievement {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_filename: Option<String>,
}
