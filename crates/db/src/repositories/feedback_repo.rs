//! Repository for feedback records.

use asmakam_core::feedback::{generate_feedback_id, FeedbackRecord, FeedbackStatus, NewFeedback};
use chrono::Utc;

use crate::store::{FeedbackStore, StoreError, Write};

/// Provides CRUD operations for feedback records.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a validated submission.
    ///
    /// Returns the stored record and the new total count. The list is kept
    /// newest-first.
    pub async fn create(
        store: &FeedbackStore,
        input: NewFeedback,
    ) -> Result<(FeedbackRecord, usize), StoreError> {
        store
            .write(|records| {
                let now = Utc::now();
                let mut id = generate_feedback_id(now);
                while records.iter().any(|r| r.id == id) {
                    id = generate_feedback_id(now);
                }

                let record = FeedbackRecord::new(id, input, now);
                records.push(record.clone());
                records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                Write::Commit((record, records.len()))
            })
            .await
    }

    /// All records, newest first.
    pub async fn list(store: &FeedbackStore) -> Vec<FeedbackRecord> {
        store.snapshot().await
    }

    pub async fn find_by_id(store: &FeedbackStore, id: &str) -> Option<FeedbackRecord> {
        store.snapshot().await.into_iter().find(|r| r.id == id)
    }

    /// Set `status` and bump `updated_at`. `None` if no record has `id`.
    pub async fn update_status(
        store: &FeedbackStore,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<Option<FeedbackRecord>, StoreError> {
        store
            .write(|records| {
                let Some(record) = records.iter_mut().find(|r| r.id == id) else {
                    return Write::Skip(None);
                };
                record.status = status;
                record.updated_at = Utc::now();
                Write::Commit(Some(record.clone()))
            })
            .await
    }

    /// Remove the record with `id`. Returns the remaining count, or `None`
    /// if nothing matched.
    pub async fn delete(store: &FeedbackStore, id: &str) -> Result<Option<usize>, StoreError> {
        store
            .write(|records| {
                let before = records.len();
                records.retain(|r| r.id != id);
                if records.len() == before {
                    Write::Skip(None)
                } else {
                    Write::Commit(Some(records.len()))
                }
            })
            .await
    }
}
