//! Route definitions for the order page contact details.
//!
//! Mounted at `/order` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// ```text
/// GET    /contact   -> get_order_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/contact", get(contact::get_order_contact))
}
