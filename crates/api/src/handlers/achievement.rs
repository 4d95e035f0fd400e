//! Handlers for the `/achievements` resource.

use archive_core::attachments::AttachmentKind;
use archive_core::error::CoreError;
use archive_core::types::DbId;
use archive_db::models::achievement::{Achievement, CreateAchievement, UpdateAchievement};
use archive_db::repositories::AchievementRepo;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::upload::{read_multipart, remove_upload, store_optional, MultipartForm};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{CreatedResponse, DeleteResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Achievement",
        id,
    })
}

/// GET /api/achievements
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Achievement>>> {
    let achievements = AchievementRepo::list(&state.pool).await?;
    Ok(Json(achievements))
}

/// GET /api/achievements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Achievement>> {
    let achievement = AchievementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(achievement))
}

/// POST /api/achievements (multipart, optional `image` file)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let form = read_multipart(multipart, AttachmentKind::Image).await?;
    let mut input = create_input(&form)?;

    let upload_dir = &state.config.upload_dir;
    input.image_filename = store_optional(upload_dir, &form).await?;

    let achievement = match AchievementRepo::create(&state.pool, &input).await {
        Ok(achievement) => achievement,
        Err(e) => {
            if let Some(name) = &input.image_filename {
                remove_upload(upload_dir, name).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        achievement_id = achievement.id,
        user_id = admin.user_id,
        "Achievement created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: achievement.id,
            message: "Achievement created successfully".to_string(),
        }),
    ))
}

/// PUT /api/achievements/{id} (multipart, partial)
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let form = read_multipart(multipart, AttachmentKind::Image).await?;
    let mut input = update_input(&form)?;

    let existing = AchievementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let upload_dir = &state.config.upload_dir;
    input.image_filename = store_optional(upload_dir, &form).await?;

    let updated = match AchievementRepo::update(&state.pool, id, &input).await {
        Ok(Some(updated)) => updated,
        result => {
            if let Some(name) = &input.image_filename {
                remove_upload(upload_dir, name).await;
            }
            return Err(match result {
                Err(e) => e.into(),
                _ => not_found(id),
            });
        }
    };

    if let Some(old) = existing.image_filename.as_deref() {
        if updated.image_filename.as_deref() != Some(old) {
            remove_upload(upload_dir, old).await;
        }
    }

    tracing::info!(achievement_id = id, user_id = admin.user_id, "Achievement updated");
    Ok(Json(MessageResponse::new("Achievement updated successfully")))
}

/// DELETE /api/achievements/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = AchievementRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(name) = deleted.image_filename.as_deref() {
        remove_upload(&state.config.upload_dir, name).await;
    }

    tracing::info!(achievement_id = id, user_id = admin.user_id, "Achievement deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Achievement deleted successfully".to_string(),
    }))
}

fn create_input(form: &MultipartForm) -> AppResult<CreateAchievement> {
    Ok(CreateAchievement {
        title: form.required("title")?,
        description: form.text("description").map(str::to_string),
        image_filename: None,
    })
}

fn update_input(form: &MultipartForm) -> AppResult<UpdateAchievement> {
    Ok(UpdateAchievement {
        title: form.non_blank("title")?,
        description: form.raw("description").map(str::to_string),
        image_filename: None,
    })
}
