//! Repository for the `projects` table: CRUD, filtered listing and the
//! catalog statistics.

use archive_core::search::like_pattern;
use archive_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, DepartmentCount, Project, ProjectFilter, ProjectStats, ProjectTypeCount,
    UpdateProject, YearCount,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, authors, adviser, year, abstract, keywords, department, \
                       project_type, status, pdf_filename, created_at, updated_at";

/// Catalog ordering. Titles compare byte-wise (`"C"` collation) whatever the
/// database locale; `id` only separates rows whose year and title are equal.
const ORDER_BY: &str = "ORDER BY year DESC, title COLLATE \"C\" ASC, id ASC";

/// Provides CRUD, filtering and aggregation for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `completed`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (title, authors, adviser, year, abstract, keywords,
                 department, project_type, status, pdf_filename)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'completed'), $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.authors)
            .bind(&input.adviser)
            .bind(input.year)
            .bind(&input.abstract_text)
            .bind(&input.keywords)
            .bind(&input.department)
            .bind(&input.project_type)
            .bind(&input.status)
            .bind(&input.pdf_filename)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching every `Some` field of `filter`, ordered by
    /// year descending then title ascending.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let (where_clause, next_idx) = build_where_clause(filter);

        let query = format!(
            "SELECT {COLUMNS} FROM projects {where_clause} {ORDER_BY} \
             LIMIT ${next_idx} OFFSET ${offset_idx}",
            offset_idx = next_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Project>(&query);

        // Bind dynamic parameters in the order `build_where_clause` numbered them.
        if let Some(ref search) = filter.search {
            q = q.bind(like_pattern(search));
        }
        if let Some(ref department) = filter.department {
            q = q.bind(department);
        }
        if let Some(ref project_type) = filter.project_type {
            q = q.bind(project_type);
        }
        if let Some(year) = filter.year {
            q = q.bind(year);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }

        // A NULL limit means LIMIT ALL in PostgreSQL.
        q = q.bind(filter.limit).bind(filter.offset);
        q.fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                authors = COALESCE($3, authors),
                adviser = COALESCE($4, adviser),
                year = COALESCE($5, year),
                abstract = COALESCE($6, abstract),
                keywords = COALESCE($7, keywords),
                department = COALESCE($8, department),
                project_type = COALESCE($9, project_type),
                status = COALESCE($10, status),
                pdf_filename = COALESCE($11, pdf_filename)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.authors)
            .bind(&input.adviser)
            .bind(input.year)
            .bind(&input.abstract_text)
            .bind(&input.keywords)
            .bind(&input.department)
            .bind(&input.project_type)
            .bind(&input.status)
            .bind(&input.pdf_filename)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project, returning the removed row (so the caller
    /// can release its attachment) or `None` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of projects in the catalog.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
    }

    /// Compute the catalog overview: total plus counts per department,
    /// project type and year.
    ///
    /// All four reads share one `REPEATABLE READ` snapshot, so `total` always
    /// equals the sum of each breakdown even while writes are in flight.
    pub async fn stats(pool: &PgPool) -> Result<ProjectStats, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&mut *tx)
            .await?;

        let by_department = sqlx::query_as::<_, DepartmentCount>(
            "SELECT department, COUNT(*) AS count
             FROM projects
             GROUP BY department
             ORDER BY department",
        )
        .fetch_all(&mut *tx)
        .await?;

        let by_project_type = sqlx::query_as::<_, ProjectTypeCount>(
            "SELECT project_type, COUNT(*) AS count
             FROM projects
             GROUP BY project_type
             ORDER BY project_type",
        )
        .fetch_all(&mut *tx)
        .await?;

        let by_year = sqlx::query_as::<_, YearCount>(
            "SELECT year, COUNT(*) AS count
             FROM projects
             GROUP BY year
             ORDER BY year DESC",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProjectStats {
            total,
            by_department,
            by_project_type,
            by_year,
        })
    }
}

/// Build the dynamic `WHERE` clause for [`ProjectRepo::list`].
///
/// Returns the clause (empty when unfiltered) and the next free bind index.
fn build_where_clause(filter: &ProjectFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.search.is_some() {
        conditions.push(format!(
            "(title ILIKE ${bind_idx} ESCAPE '\\' \
              OR authors ILIKE ${bind_idx} ESCAPE '\\' \
              OR keywords ILIKE ${bind_idx} ESCAPE '\\')"
        ));
        bind_idx += 1;
    }
    if filter.department.is_some() {
        conditions.push(format!("department = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.project_type.is_some() {
        conditions.push(format!("project_type = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.year.is_some() {
        conditions.push(format!("year = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.status.is_some() {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, bind_idx)
}
