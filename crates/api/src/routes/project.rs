//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create (multipart)
/// GET    /stats/overview  -> stats
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update (multipart)
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/stats/overview", get(project::stats))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
}
