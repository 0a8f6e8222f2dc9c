//! Feedback entity model and admin DTOs.

use serde::Deserialize;

pub use asmakam_core::feedback::{FeedbackRecord, FeedbackStatus, NewFeedback};

/// Body of `PATCH /api/feedback`.
#[derive(Debug, Deserialize)]
pub struct UpdateFeedbackStatus {
    pub id: Option<String>,
    pub status: Option<String>,
}

/// Body of `DELETE /api/feedback`.
#[derive(Debug, Deserialize)]
pub struct DeleteFeedback {
    pub id: Option<String>,
}
