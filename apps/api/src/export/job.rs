//! Export job registry — the tri-state lifecycle channel for PDF exports.
//!
//! Export runs as a background task; callers poll the job status and fetch
//! the finished bytes. A failed export never surfaces as an uncaught error,
//! it lands in the same channel as `failed`.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ExportStatus {
    InProgress,
    Succeeded { filename: String },
    Failed { error: String },
}

struct ExportJob {
    status: ExportStatus,
    bytes: Option<Bytes>,
}

#[derive(Default)]
pub struct ExportJobs {
    inner: RwLock<HashMap<Uuid, ExportJob>>,
}

impl ExportJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-progress job and returns its id.
    pub async fn start(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(
            id,
            ExportJob {
                status: ExportStatus::InProgress,
                bytes: None,
            },
        );
        id
    }

    pub async fn complete(&self, id: Uuid, filename: String, bytes: Bytes) {
        if let Some(job) = self.inner.write().await.get_mut(&id) {
            job.status = ExportStatus::Succeeded { filename };
            job.bytes = Some(bytes);
        }
    }

    pub async fn fail(&self, id: Uuid, error: String) {
        if let Some(job) = self.inner.write().await.get_mut(&id) {
            job.status = ExportStatus::Failed { error };
        }
    }

    pub async fn status(&self, id: Uuid) -> Option<ExportStatus> {
        self.inner.read().await.get(&id).map(|j| j.status.clone())
    }

    /// Returns `(filename, bytes)` for a finished job and drops its record.
    /// Downloads are one-shot so the registry never accumulates finished
    /// payloads; in-progress and failed jobs stay until removed.
    pub async fn download(&self, id: Uuid) -> Option<(String, Bytes)> {
        let mut jobs = self.inner.write().await;
        let finished = matches!(
            jobs.get(&id),
            Some(ExportJob {
                status: ExportStatus::Succeeded { .. },
                bytes: Some(_),
            })
        );
        if !finished {
            return None;
        }
        let job = jobs.remove(&id)?;
        match (job.status, job.bytes) {
            (ExportStatus::Succeeded { filename }, Some(bytes)) => Some((filename, bytes)),
            _ => None,
        }
    }

    /// Drops a job record, e.g. a failed job the client has acknowledged.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_job_lifecycle_success() {
        let jobs = ExportJobs::new();
        let id = jobs.start().await;
        assert_eq!(jobs.status(id).await, Some(ExportStatus::InProgress));
        assert!(jobs.download(id).await.is_none());

        jobs.complete(id, "resume-1.pdf".to_string(), Bytes::from_static(b"%PDF"))
            .await;
        assert!(matches!(
            jobs.status(id).await,
            Some(ExportStatus::Succeeded { .. })
        ));
        let (filename, bytes) = jobs.download(id).await.unwrap();
        assert_eq!(filename, "resume-1.pdf");
        assert_eq!(&bytes[..], b"%PDF");

        // The download consumed the record; nothing is retained.
        assert!(jobs.status(id).await.is_none());
        assert!(jobs.download(id).await.is_none());
    }

    #[tokio::test]
    async fn test_job_lifecycle_failure() {
        let jobs = ExportJobs::new();
        let id = jobs.start().await;
        jobs.fail(id, "Preview element not found".to_string()).await;
        assert_eq!(
            jobs.status(id).await,
            Some(ExportStatus::Failed {
                error: "Preview element not found".to_string()
            })
        );
        assert!(jobs.download(id).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let jobs = ExportJobs::new();
        assert!(jobs.status(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_drops_failed_job() {
        let jobs = ExportJobs::new();
        let id = jobs.start().await;
        jobs.fail(id, "Failed to export resume".to_string()).await;

        assert!(jobs.remove(id).await);
        assert!(jobs.status(id).await.is_none());
        assert!(!jobs.remove(id).await);
    }
}
