//! Ordering contact details for the order page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;

/// Phone lines and WhatsApp link customers should use while online
/// ordering is unavailable.
pub async fn get_order_contact(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.config.order_contact.view(),
    })
}
