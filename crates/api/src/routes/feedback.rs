//! Route definitions for customer feedback.
//!
//! Mounted at `/feedback` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Feedback routes.
///
/// ```text
/// POST   /          -> submit_feedback
/// GET    /          -> list_feedback           (admin)
/// PATCH  /          -> update_feedback_status  (admin)
/// DELETE /          -> delete_feedback         (admin)
/// GET    /export    -> export_feedback         (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(feedback::submit_feedback)
                .get(feedback::list_feedback)
                .patch(feedback::update_feedback_status)
                .delete(feedback::delete_feedback),
        )
        .route("/export", get(feedback::export_feedback))
}
