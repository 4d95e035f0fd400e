//! Route definitions for the `/achievements` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::achievement;
use crate::state::AppState;

/// Routes mounted at `/achievements`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create (multipart)
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update (multipart)
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(achievement::list).post(achievement::create))
        .route(
            "/{id}",
            get(achievement::get_by_id)
                .put(achievement::update)
                .delete(achievement::delete),
        )
}
