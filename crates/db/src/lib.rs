//! Flat-file persistence for feedback records.
//!
//! The whole store is a single pretty-printed JSON array on disk, mirrored
//! in memory by [`FeedbackStore`]. Domain operations live in
//! [`repositories::FeedbackRepo`].

pub mod models;
pub mod repositories;
pub mod store;

use std::path::PathBuf;

pub use store::{FeedbackStore, StoreError, Write};

/// Open (or lazily create) the store backing file at `path`.
pub async fn open_store(path: impl Into<PathBuf>) -> Result<FeedbackStore, StoreError> {
    FeedbackStore::open(path).await
}

/// Returns the number of stored records. Cheap; never touches the disk.
pub async fn health_check(store: &FeedbackStore) -> usize {
    store.len().await
}
