// src/server/sessions.rs
// Session ownership: state + history per session id, and per-session locks
// so no two turns for one session ever run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::dialogue::{ChatTurn, SessionState};

/// Everything the front door keeps for one conversation.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub history: Vec<ChatTurn>,
}

/// In-memory session store, keyed by session id.
///
/// The dialogue core never touches this: it receives a state snapshot by
/// reference for one turn, and the handler puts the mutated copy back only
/// after the turn succeeds. A failed turn leaves the stored snapshot as it
/// was, so the same message can be retried safely.
#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<HashMap<String, SessionSnapshot>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for a session, or a fresh one if unseen.
    pub async fn get(&self, session_id: &str) -> SessionSnapshot {
        self.inner
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn put(&self, session_id: &str, snapshot: SessionSnapshot) {
        self.inner
            .write()
            .await
            .insert(session_id.to_string(), snapshot);
    }

    pub async fn delete(&self, session_id: &str) {
        self.inner.write().await.remove(session_id);
    }
}

// ============================================================================
// Per-Session Locking
// ============================================================================

/// Manages per-session locks. Session state is mutated in place with no
/// internal locking, so the front door serializes turns per session here;
/// different sessions proceed independently.
#[derive(Default)]
pub struct SessionLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for a session. Returns an Arc to the mutex.
    pub async fn get_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        // Fast path: check if lock exists
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(session_id) {
                return lock.clone();
            }
        }

        // Slow path: create lock if needed
        let mut locks = self.locks.write().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
