use std::sync::Arc;

use archive_mailer::ResetLinkSender;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: archive_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Delivers password reset links. `None` when SMTP is not configured,
    /// which is only allowed in development mode.
    pub reset_sender: Option<Arc<dyn ResetLinkSender>>,
}
