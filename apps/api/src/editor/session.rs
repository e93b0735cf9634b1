//! Editor sessions — one in-memory document per open editing session.
//!
//! The session is the only owner of the document; the preview reads it, the
//! mutation handlers write it, and every mutation publishes a new revision on
//! a watch channel so observers can re-render reactively.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use uuid::Uuid;

use crate::editor::document::ResumeDocument;
use crate::errors::AppError;

#[derive(Debug)]
pub struct EditorSession {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Stored resume this session was opened from, if any.
    pub resume_id: Option<Uuid>,
    pub document: ResumeDocument,
    pub revision: u64,
    /// AI operations are serialized per session: while one is pending, a
    /// second request is rejected. Plain field edits stay allowed. The flag
    /// lives outside the session lock so the drop guard can clear it without
    /// re-locking.
    assist_in_flight: Arc<AtomicBool>,
    revision_tx: watch::Sender<u64>,
}

/// Holds the per-session AI serialization flag for the duration of one
/// operation. Clearing on drop covers every exit path, including a request
/// abandoned while the generation call is pending.
#[must_use]
pub struct AssistGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for AssistGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl EditorSession {
    fn new(user_id: Uuid, resume_id: Option<Uuid>, document: ResumeDocument) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            id: Uuid::new_v4(),
            user_id,
            resume_id,
            document,
            revision: 0,
            assist_in_flight: Arc::new(AtomicBool::new(false)),
            revision_tx,
        }
    }

    /// Applies one mutation to the document and notifies subscribers.
    pub fn mutate(&mut self, f: impl FnOnce(&mut ResumeDocument)) {
        f(&mut self.document);
        self.revision += 1;
        // Send fails only when no subscriber exists, which is fine.
        let _ = self.revision_tx.send(self.revision);
    }

    /// Subscribes to document-changed notifications (current revision values).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Marks an AI operation as in flight; rejects overlap with a conflict.
    /// The returned guard releases the flag when dropped.
    pub fn begin_assist(&self) -> Result<AssistGuard, AppError> {
        if self
            .assist_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::Conflict(
                "An AI operation is already running for this session".to_string(),
            ));
        }
        Ok(AssistGuard {
            flag: Arc::clone(&self.assist_in_flight),
        })
    }
}

pub type SharedSession = Arc<Mutex<EditorSession>>;

/// In-memory registry of open editor sessions.
#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `user_id`, seeded from `document` (a blank
    /// document when starting a new resume). Returns the session id.
    pub async fn open(
        &self,
        user_id: Uuid,
        resume_id: Option<Uuid>,
        document: ResumeDocument,
    ) -> Uuid {
        let session = EditorSession::new(user_id, resume_id, document);
        let id = session.id;
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Editor session {id} not found")))
    }

    /// Like `get`, but also checks the session belongs to `user_id`.
    pub async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<SharedSession, AppError> {
        let session = self.get(id).await?;
        if session.lock().await.user_id != user_id {
            return Err(AppError::Unauthorized);
        }
        Ok(session)
    }

    /// Closes a session, discarding its document. There is no autosave;
    /// unsaved edits are lost.
    pub async fn close(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}
