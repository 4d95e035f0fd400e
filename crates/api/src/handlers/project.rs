//! Handlers for the `/projects` resource.
//!
//! Reads are public. Mutations take [`RequireAdmin`] as their first
//! extractor, so an unauthenticated request is rejected before its multipart
//! body is read or the database is touched.

use archive_core::attachments::AttachmentKind;
use archive_core::catalog::{validate_year, Department, ProjectStatus, ProjectType};
use archive_core::error::CoreError;
use archive_core::types::DbId;
use archive_db::models::project::{CreateProject, Project, ProjectStats, UpdateProject};
use archive_db::repositories::ProjectRepo;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::upload::{read_multipart, remove_upload, store_optional, MultipartForm};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ProjectListParams;
use crate::response::{CreatedResponse, DeleteResponse, MessageResponse};
use crate::state::AppState;

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<Project>>> {
    let filter = params.into_filter()?;
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// GET /api/projects/stats/overview
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ProjectStats>> {
    let stats = ProjectRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}

/// POST /api/projects (multipart, optional `pdf` file)
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let form = read_multipart(multipart, AttachmentKind::Pdf).await?;
    let mut input = create_input(&form)?;

    let upload_dir = &state.config.upload_dir;
    input.pdf_filename = store_optional(upload_dir, &form).await?;

    let project = match ProjectRepo::create(&state.pool, &input).await {
        Ok(project) => project,
        Err(e) => {
            if let Some(name) = &input.pdf_filename {
                remove_upload(upload_dir, name).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(project_id = project.id, user_id = admin.user_id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: project.id,
            message: "Project created successfully".to_string(),
        }),
    ))
}

/// PUT /api/projects/{id} (multipart, partial)
///
/// Absent fields keep their value. A new `pdf` replaces the old attachment,
/// whose file is then removed.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let form = read_multipart(multipart, AttachmentKind::Pdf).await?;
    let mut input = update_input(&form)?;

    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    let upload_dir = &state.config.upload_dir;
    input.pdf_filename = store_optional(upload_dir, &form).await?;

    let updated = match ProjectRepo::update(&state.pool, id, &input).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(name) = &input.pdf_filename {
                remove_upload(upload_dir, name).await;
            }
            return Err(e.into());
        }
    };

    let Some(updated) = updated else {
        // Deleted between the lookup and the update.
        if let Some(name) = &input.pdf_filename {
            remove_upload(upload_dir, name).await;
        }
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    };

    if let Some(old) = existing.pdf_filename.as_deref() {
        if updated.pdf_filename.as_deref() != Some(old) {
            remove_upload(upload_dir, old).await;
        }
    }

    tracing::info!(project_id = id, user_id = admin.user_id, "Project updated");
    Ok(Json(MessageResponse::new("Project updated successfully")))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if let Some(name) = deleted.pdf_filename.as_deref() {
        remove_upload(&state.config.upload_dir, name).await;
    }

    tracing::info!(project_id = id, user_id = admin.user_id, "Project deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Project deleted successfully".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

fn parse_year(raw: &str) -> AppResult<i32> {
    let year = raw
        .parse::<i32>()
        .map_err(|_| CoreError::Validation(format!("Invalid year '{raw}'")))?;
    validate_year(year)?;
    Ok(year)
}

/// Validate a create form. Department, type and status are stored in their
/// canonical spelling.
pub fn create_input(form: &MultipartForm) -> AppResult<CreateProject> {
    let title = form.required("title")?;
    let authors = form.required("authors")?;
    let year = parse_year(&form.required("year")?)?;
    let department: Department = form.required("department")?.parse()?;
    let project_type: ProjectType = form.required("project_type")?.parse()?;
    let status = form
        .text("status")
        .map(str::parse::<ProjectStatus>)
        .transpose()?
        .unwrap_or_default();

    Ok(CreateProject {
        title,
        authors,
        adviser: form.text("adviser").map(str::to_string),
        year,
        abstract_text: form.text("abstract").map(str::to_string),
        keywords: form.text("keywords").map(str::to_string),
        department: department.to_string(),
        project_type: project_type.to_string(),
        status: Some(status.to_string()),
        pdf_filename: None,
    })
}

/// Validate an update form. Required columns may be omitted but not blanked;
/// the free-text columns may be cleared with an empty value.
pub fn update_input(form: &MultipartForm) -> AppResult<UpdateProject> {
    let year = form
        .non_blank("year")?
        .map(|raw| parse_year(&raw))
        .transpose()?;
    let department = form
        .non_blank("department")?
        .map(|raw| raw.parse::<Department>())
        .transpose()?;
    let project_type = form
        .non_blank("project_type")?
        .map(|raw| raw.parse::<ProjectType>())
        .transpose()?;
    let status = form
        .non_blank("status")?
        .map(|raw| raw.parse::<ProjectStatus>())
        .transpose()?;

    Ok(UpdateProject {
        title: form.non_blank("title")?,
        authors: form.non_blank("authors")?,
        adviser: form.raw("adviser").map(str::to_string),
        year,
        abstract_text: form.raw("abstract").map(str::to_string),
        keywords: form.raw("keywords").map(str::to_string),
        department: department.map(|d| d.to_string()),
        project_type: project_type.map(|t| t.to_string()),
        status: status.map(|s| s.to_string()),
        pdf_filename: None,
    })
}
