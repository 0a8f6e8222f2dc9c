//! JSON file store with serialized writes.
//!
//! Every mutation runs under one async mutex, so concurrent handlers cannot
//! interleave their read-modify-write cycles. A mutation is applied to a
//! copy of the list, the copy is written to a temp file and renamed over
//! the target, and only then does the in-memory list change. A failed
//! write leaves both the file and memory as they were.
//!
//! The persist-and-swap step runs in its own task holding the lock, so a
//! caller dropped mid-write (client disconnect, request timeout) cannot
//! leave the file ahead of memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use asmakam_core::feedback::FeedbackRecord;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Feedback file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feedback file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Feedback write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Outcome of a mutation passed to [`FeedbackStore::write`].
pub enum Write<T> {
    /// Persist the working copy, then return the value.
    Commit(T),
    /// Nothing changed; discard the working copy and return the value.
    Skip(T),
}

/// The process-wide feedback store. Construct once, share via `Arc`.
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl FeedbackStore {
    /// Load the store from `path`.
    ///
    /// A missing or empty file is an empty store; the parent directory is
    /// created on demand. A file that does not parse is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Feedback store loaded",
        );

        Ok(Self {
            path,
            records: Arc::new(Mutex::new(records)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Copy of the current list, in stored (newest-first) order.
    pub async fn snapshot(&self) -> Vec<FeedbackRecord> {
        self.records.lock().await.clone()
    }

    /// Apply `f` to a working copy and, on [`Write::Commit`], persist it.
    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut Vec<FeedbackRecord>) -> Write<T>,
    ) -> Result<T, StoreError> {
        let mut guard = Arc::clone(&self.records).lock_owned().await;
        let mut working = guard.clone();

        match f(&mut working) {
            Write::Skip(out) => Ok(out),
            Write::Commit(out) => {
                let path = self.path.clone();
                let commit = tokio::spawn(async move {
                    persist(&path, &working).await?;
                    *guard = working;
                    Ok::<_, StoreError>(())
                });
                commit.await??;
                Ok(out)
            }
        }
    }
}

async fn persist(path: &Path, records: &[FeedbackRecord]) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(records)?;
    let tmp = tmp_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&tmp, &body).await?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        tracing::error!(path = %path.display(), error = %e, "Failed to replace feedback file");
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "feedback.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
