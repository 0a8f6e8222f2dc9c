//! Handlers for customer feedback.
//!
//! Submission is public. Listing, status updates, deletion and CSV export
//! require the admin bearer token (see [`AdminAuth`]).

use asmakam_core::dashboard::{export_csv, export_filename, DashboardQuery, FeedbackStats};
use asmakam_core::error::CoreError;
use asmakam_core::feedback::{FeedbackRecord, FeedbackStatus, FeedbackSubmission};
use asmakam_core::types::Timestamp;
use asmakam_db::models::feedback::{DeleteFeedback, UpdateFeedbackStatus};
use asmakam_db::repositories::FeedbackRepo;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: FeedbackRecord,
    pub total_feedback: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListResponse {
    pub success: bool,
    pub data: Vec<FeedbackRecord>,
    pub stats: FeedbackStats,
    pub last_updated: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct FeedbackUpdatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: FeedbackRecord,
}

#[derive(Debug, Serialize)]
pub struct FeedbackDeletedResponse {
    pub success: bool,
    pub message: &'static str,
    pub remaining: usize,
}

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Feedback",
        id: id.to_string(),
    })
}

/// Trimmed, non-empty value of an optional body field.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// POST /api/feedback
// ---------------------------------------------------------------------------

/// Validate and store a new submission.
pub async fn submit_feedback(
    State(state): State<AppState>,
    AppJson(input): AppJson<FeedbackSubmission>,
) -> AppResult<impl IntoResponse> {
    let new_feedback = input.validate()?;

    let (record, total) = FeedbackRepo::create(&state.store, new_feedback).await?;

    tracing::info!(
        feedback_id = %record.id,
        service_type = record.service_type.as_str(),
        quality_rating = record.quality_rating,
        total,
        "Feedback submitted",
    );

    Ok((
        StatusCode::CREATED,
        Json(FeedbackCreatedResponse {
            success: true,
            message: "Feedback submitted successfully",
            data: record,
            total_feedback: total,
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /api/feedback
// ---------------------------------------------------------------------------

/// Full feedback list (newest first) with aggregate stats. Admin only.
pub async fn list_feedback(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let records = FeedbackRepo::list(&state.store).await;
    let now = Utc::now();
    let stats = FeedbackStats::compute(&records, now);

    Ok(Json(FeedbackListResponse {
        success: true,
        data: records,
        stats,
        last_updated: now,
    }))
}

// ---------------------------------------------------------------------------
// PATCH /api/feedback
// ---------------------------------------------------------------------------

/// Change a record's status. Admin only.
pub async fn update_feedback_status(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateFeedbackStatus>,
) -> AppResult<impl IntoResponse> {
    let (Some(id), Some(status)) = (required(input.id.as_deref()), required(input.status.as_deref()))
    else {
        return Err(AppError::BadRequest("ID and status are required".into()));
    };
    let status = FeedbackStatus::parse(status)?;

    let updated = FeedbackRepo::update_status(&state.store, id, status)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(feedback_id = %id, status = status.as_str(), "Feedback status updated");

    Ok(Json(FeedbackUpdatedResponse {
        success: true,
        message: "Feedback updated successfully",
        data: updated,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /api/feedback
// ---------------------------------------------------------------------------

/// Permanently remove a record. Admin only.
pub async fn delete_feedback(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<DeleteFeedback>,
) -> AppResult<impl IntoResponse> {
    let id = required(input.id.as_deref())
        .ok_or_else(|| AppError::BadRequest("Feedback ID is required".into()))?;

    let remaining = FeedbackRepo::delete(&state.store, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(feedback_id = %id, remaining, "Feedback deleted");

    Ok(Json(FeedbackDeletedResponse {
        success: true,
        message: "Feedback deleted successfully",
        remaining,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/feedback/export
// ---------------------------------------------------------------------------

/// CSV download of the filtered, searched and sorted view. Admin only.
pub async fn export_feedback(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> AppResult<impl IntoResponse> {
    let records = FeedbackRepo::list(&state.store).await;
    let view = query.apply(&records);
    let csv = export_csv(&view);

    tracing::debug!(rows = view.len(), total = records.len(), "Feedback exported");

    let disposition = format!("attachment; filename=\"{}\"", export_filename(Utc::now()));
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
