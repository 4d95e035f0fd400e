pub mod achievement;
pub mod auth;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                   login (public)
/// /auth/forgot-password         issue reset link (public)
/// /auth/reset-password          redeem reset token (public)
/// /auth/me                      current account (auth required)
///
/// /projects                     list (public), create (admin)
/// /projects/stats/overview      catalog statistics (public)
/// /projects/{id}                get (public), update, delete (admin)
///
/// /achievements                 list (public), create (admin)
/// /achievements/{id}            get (public), update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/achievements", achievement::router())
}
