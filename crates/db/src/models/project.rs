//! Project entity model, DTOs, list filter and statistics rows.

use archive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub authors: String,
    pub adviser: Option<String>,
    pub year: i32,
    #[serde(rename = "abstract")]
    #[sqlx(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub department: String,
    pub project_type: String,
    pub status: String,
    pub pdf_filename: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
///
/// Enumerated fields carry canonical spellings; the API layer normalises them
/// before this struct is built.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub authors: String,
    pub adviser: Option<String>,
    pub year: i32,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub department: String,
    pub project_type: String,
    /// Defaults to `completed` if omitted.
    pub status: Option<String>,
    pub pdf_filename: Option<String>,
}

/// DTO for patching an existing project. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub adviser: Option<String>,
    pub year: Option<i32>,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub department: Option<String>,
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub pdf_filename: Option<String>,
}

/// Catalog list filter. Every `Some` field narrows the result (logical AND).
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring over title, authors and keywords.
    pub search: Option<String>,
    pub department: Option<String>,
    pub project_type: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
    /// `None` lists every matching row.
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Project count for one department.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

/// Project count for one project type.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct ProjectTypeCount {
    pub project_type: String,
    pub count: i64,
}

/// Project count for one publication year.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Catalog overview returned by `GET /api/projects/stats/overview`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: i64,
    pub by_department: Vec<DepartmentCount>,
    pub by_project_type: Vec<ProjectTypeCount>,
    /// Sorted by year, newest first.
    pub by_year: Vec<YearCount>,
}
