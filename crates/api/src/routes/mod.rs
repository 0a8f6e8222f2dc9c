pub mod contact;
pub mod feedback;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /feedback                 submit (public), list, update status, delete (admin)
/// /feedback/export          CSV export of a filtered view (admin)
///
/// /order/contact            phone / WhatsApp ordering details (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/feedback", feedback::router())
        .nest("/order", contact::router())
}
