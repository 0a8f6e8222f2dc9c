use std::sync::Arc;

use asmakam_db::FeedbackStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The feedback store, opened once at start-up.
    pub store: Arc<FeedbackStore>,
    /// Server configuration (admin secret, contact details, ...).
    pub config: Arc<ServerConfig>,
}
