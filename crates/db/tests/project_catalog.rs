//! Integration tests for the project catalog: CRUD, filtering, ordering and
//! statistics, exercised against a real database.

use archive_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use archive_db::repositories::ProjectRepo;
use assert_matches::assert_matches;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(title: &str, year: i32, department: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        authors: "Juan Dela Cruz, Maria Santos".to_string(),
        adviser: None,
        year,
        abstract_text: None,
        keywords: None,
        department: department.to_string(),
        project_type: "Capstone".to_string(),
        status: None,
        pdf_filename: None,
    }
}

async fn insert(pool: &PgPool, input: CreateProject) -> i64 {
    ProjectRepo::create(pool, &input)
        .await
        .expect("project creation should succeed")
        .id
}

fn titles_and_years(projects: &[archive_db::models::project::Project]) -> Vec<(i32, String)> {
    projects.iter().map(|p| (p.year, p.title.clone())).collect()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_defaults(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Smart Farm", 2024, "CPE"))
        .await
        .unwrap();

    assert_eq!(project.status, "completed");
    assert!(project.pdf_filename.is_none());
    assert_eq!(project.created_at, project.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_is_partial_and_keeps_attachment(pool: PgPool) {
    let mut input = new_project("Original", 2023, "IE");
    input.pdf_filename = Some("1700000000000-1.pdf".to_string());
    let id = insert(&pool, input).await;

    let patch = UpdateProject {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.year, 2023);
    assert_eq!(updated.pdf_filename.as_deref(), Some("1700000000000-1.pdf"));
    assert!(updated.updated_at >= updated.created_at);

    let patch = UpdateProject {
        pdf_filename: Some("1700000000001-2.pdf".to_string()),
        ..Default::default()
    };
    let replaced = ProjectRepo::update(&pool, id, &patch).await.unwrap().unwrap();
    assert_eq!(replaced.pdf_filename.as_deref(), Some("1700000000001-2.pdf"));
    assert_eq!(replaced.title, "Renamed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_returns_none(pool: PgPool) {
    let result = ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_returns_row_then_none(pool: PgPool) {
    let id = insert(&pool, new_project("Doomed", 2022, "IE")).await;

    let deleted = ProjectRepo::delete(&pool, id).await.unwrap();
    assert_matches!(deleted, Some(ref p) if p.id == id);

    assert!(ProjectRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(ProjectRepo::delete(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_department_violates_check(pool: PgPool) {
    let result = ProjectRepo::create(&pool, &new_project("Bad", 2024, "Astronomy")).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Listing, ordering and filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_by_year_desc_then_title(pool: PgPool) {
    insert(&pool, new_project("B", 2023, "IE")).await;
    insert(&pool, new_project("A", 2024, "IE")).await;
    insert(&pool, new_project("A", 2023, "CPE")).await;

    let projects = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();

    assert_eq!(
        titles_and_years(&projects),
        vec![
            (2024, "A".to_string()),
            (2023, "A".to_string()),
            (2023, "B".to_string()),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_order_is_bytewise_regardless_of_locale(pool: PgPool) {
    for title in ["apple", "ab", "Banana", "a-b"] {
        insert(&pool, new_project(title, 2024, "IE")).await;
    }

    let projects = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();

    assert_eq!(titles, vec!["Banana", "a-b", "ab", "apple"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_department_and_year_filters_combine(pool: PgPool) {
    insert(&pool, new_project("CPE 2024", 2024, "CPE")).await;
    insert(&pool, new_project("CPE 2023", 2023, "CPE")).await;
    insert(&pool, new_project("IE 2024", 2024, "IE")).await;

    let cpe = ProjectFilter {
        department: Some("CPE".into()),
        ..Default::default()
    };
    let projects = ProjectRepo::list(&pool, &cpe).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|p| p.department == "CPE"));

    let cpe_2024 = ProjectFilter {
        department: Some("CPE".into()),
        year: Some(2024),
        ..Default::default()
    };
    let projects = ProjectRepo::list(&pool, &cpe_2024).await.unwrap();
    assert_eq!(titles_and_years(&projects), vec![(2024, "CPE 2024".to_string())]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_title_authors_or_keywords(pool: PgPool) {
    insert(&pool, new_project("IoT Smart Home", 2024, "CPE")).await;

    let mut by_author = new_project("Traffic Study", 2023, "IE");
    by_author.authors = "Iota Reyes".to_string();
    insert(&pool, by_author).await;

    let mut by_keyword = new_project("Sensor Grid", 2023, "CPE");
    by_keyword.keywords = Some("Sensors, IOT, Mesh".to_string());
    insert(&pool, by_keyword).await;

    let mut unrelated = new_project("Lean Manufacturing", 2022, "IE");
    unrelated.keywords = Some("Six Sigma".to_string());
    unrelated.abstract_text = Some("Mentions iot only in the abstract".to_string());
    insert(&pool, unrelated).await;

    let filter = ProjectFilter {
        search: Some("iot".into()),
        ..Default::default()
    };
    let projects = ProjectRepo::list(&pool, &filter).await.unwrap();
    let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();

    assert_eq!(titles, vec!["IoT Smart Home", "Sensor Grid", "Traffic Study"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_wildcards_match_literally(pool: PgPool) {
    insert(&pool, new_project("Yield 100% Study", 2024, "IE")).await;
    insert(&pool, new_project("Yield 1000 Study", 2024, "IE")).await;

    let filter = ProjectFilter {
        search: Some("100%".into()),
        ..Default::default()
    };
    let projects = ProjectRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Yield 100% Study");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_filter_values_yield_nothing(pool: PgPool) {
    insert(&pool, new_project("Anything", 2024, "CPE")).await;

    let filter = ProjectFilter {
        project_type: Some("Dissertation".into()),
        ..Default::default()
    };
    assert!(ProjectRepo::list(&pool, &filter).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_is_a_window_of_the_full_ordering(pool: PgPool) {
    for (title, year) in [("E", 2020), ("D", 2021), ("C", 2022), ("B", 2023), ("A", 2024)] {
        insert(&pool, new_project(title, year, "IE")).await;
    }

    let all = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    let page = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            limit: Some(2),
            offset: 1,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(titles_and_years(&page), titles_and_years(&all[1..3]));
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_on_empty_catalog(pool: PgPool) {
    let stats = ProjectRepo::stats(&pool).await.unwrap();

    assert_eq!(stats.total, 0);
    assert!(stats.by_department.is_empty());
    assert!(stats.by_project_type.is_empty());
    assert!(stats.by_year.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_totals_match_every_dimension(pool: PgPool) {
    insert(&pool, new_project("One", 2022, "IE")).await;
    insert(&pool, new_project("Two", 2024, "CPE")).await;
    let mut thesis = new_project("Three", 2024, "CPE");
    thesis.project_type = "Thesis".to_string();
    insert(&pool, thesis).await;

    let stats = ProjectRepo::stats(&pool).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_department.iter().map(|d| d.count).sum::<i64>(), 3);
    assert_eq!(stats.by_project_type.iter().map(|t| t.count).sum::<i64>(), 3);
    assert_eq!(stats.by_year.iter().map(|y| y.count).sum::<i64>(), 3);

    let years: Vec<_> = stats.by_year.iter().map(|y| (y.year, y.count)).collect();
    assert_eq!(years, vec![(2024, 2), (2022, 1)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_reflect_writes_immediately(pool: PgPool) {
    assert_eq!(ProjectRepo::stats(&pool).await.unwrap().total, 0);

    let id = insert(&pool, new_project("Fresh", 2025, "CPE")).await;
    assert_eq!(ProjectRepo::stats(&pool).await.unwrap().total, 1);

    ProjectRepo::delete(&pool, id).await.unwrap();
    assert_eq!(ProjectRepo::stats(&pool).await.unwrap().total, 0);
}
