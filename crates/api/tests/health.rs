//! Integration tests for the root-level health check.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("x-request-id"),
        "request id must be propagated to the response"
    );

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app.app(), "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
