//! Query parameter types for list endpoints.

use archive_core::catalog::{normalize_filter, Department, ProjectStatus, ProjectType};
use archive_core::error::CoreError;
use archive_core::search::{clamp_offset, clamp_optional_limit, normalize_search, MAX_LIST_LIMIT};
use archive_db::models::project::ProjectFilter;
use serde::Deserialize;

use crate::error::AppResult;

/// Query string of `GET /projects`.
///
/// Every filter is optional; an empty value counts as absent. `year` arrives
/// as text so that `?year=` can mean "no filter" instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub department: Option<String>,
    pub project_type: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProjectListParams {
    /// Normalize into a repository filter.
    ///
    /// Known department/type/status aliases become canonical values; unknown
    /// values are kept and match nothing. A non-numeric year is rejected.
    pub fn into_filter(self) -> AppResult<ProjectFilter> {
        let year = match self.year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                CoreError::Validation(format!("Invalid year '{raw}'"))
            })?),
        };

        Ok(ProjectFilter {
            search: normalize_search(self.search.as_deref()).map(str::to_string),
            department: normalize_filter(self.department.as_deref(), Department::parse),
            project_type: normalize_filter(self.project_type.as_deref(), ProjectType::parse),
            year,
            status: normalize_filter(self.status.as_deref(), ProjectStatus::parse),
            limit: clamp_optional_limit(self.limit, MAX_LIST_LIMIT),
            offset: clamp_offset(self.offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_absent() {
        let filter = ProjectListParams {
            search: Some("   ".into()),
            department: Some(String::new()),
            year: Some(String::new()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert!(filter.search.is_none());
        assert!(filter.department.is_none());
        assert!(filter.year.is_none());
        assert!(filter.limit.is_none());
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn aliases_normalize_and_unknowns_pass_through() {
        let filter = ProjectListParams {
            department: Some("computer engineering".into()),
            project_type: Some("Methods of Research".into()),
            status: Some("Dormant".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.department.as_deref(), Some("CPE"));
        assert_eq!(filter.project_type.as_deref(), Some("MOR"));
        assert_eq!(filter.status.as_deref(), Some("Dormant"));
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let result = ProjectListParams {
            year: Some("twenty".into()),
            ..Default::default()
        }
        .into_filter();
        assert!(result.is_err());
    }

    #[test]
    fn pagination_is_clamped() {
        let filter = ProjectListParams {
            limit: Some(10_000),
            offset: Some(-3),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.limit, Some(MAX_LIST_LIMIT));
        assert_eq!(filter.offset, 0);
    }
}
