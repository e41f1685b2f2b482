//! In-memory session store keyed by opaque session identifier.
//!
//! The map itself sits behind an async `RwLock`; each entry carries its own
//! async `Mutex`. A chat turn holds the entry lock for the whole turn, search
//! call included, so two requests for the same identifier never interleave
//! while different identifiers proceed in parallel.

use super::Session;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Shared, lockable handle to one conversation's slots.
pub type SessionHandle = Arc<Mutex<Session>>;

struct StoredSession {
    state: SessionHandle,
    created_at: Instant,
    last_accessed: Instant,
}

impl StoredSession {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            state: Arc::new(Mutex::new(Session::new())),
            created_at: now,
            last_accessed: now,
        }
    }

    fn access(&mut self) {
        self.last_accessed = Instant::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub total_sessions: usize,
    /// Sessions with a turn in flight at the time of the snapshot.
    pub busy_sessions: usize,
    pub oldest_session_age: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty session under `id`, replacing any previous one.
    pub async fn create(&self, id: impl Into<String>) -> SessionHandle {
        let id = id.into();
        let entry = StoredSession::new();
        let handle = entry.state.clone();

        let mut sessions = self.sessions.write().await;
        if sessions.insert(id.clone(), entry).is_some() {
            log::warn!("Replaced existing session {}", id);
        } else {
            log::debug!("Created session {}", id);
        }

        handle
    }

    /// Look up a session. Never creates one: sessions only come from `create`.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(|entry| {
            entry.access();
            entry.state.clone()
        })
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`. Sessions in the middle of
    /// a turn are kept regardless of age.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, entry| {
            let idle = entry.last_accessed.elapsed();
            if idle <= max_idle {
                return true;
            }
            if entry.state.try_lock().is_err() {
                return true;
            }
            log::debug!("Expiring session {} after {:?} idle", id, idle);
            false
        });

        let purged = before - sessions.len();
        if purged > 0 {
            log::info!(
                "Purged {} idle sessions, {} remaining",
                purged,
                sessions.len()
            );
        }
        purged
    }

    pub async fn stats(&self) -> StoreStats {
        let sessions = self.sessions.read().await;
        StoreStats {
            total_sessions: sessions.len(),
            busy_sessions: sessions
                .values()
                .filter(|entry| entry.state.try_lock().is_err())
                .count(),
            oldest_session_age: sessions.values().map(|entry| entry.created_at.elapsed()).max(),
        }
    }
}

/// Fresh session identifier: hex SHA-256 over a nanosecond timestamp and a
/// random UUID, so identifiers minted within the same second still differ.
pub fn generate_session_id() -> String {
    let now = chrono::Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));

    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", nanos, uuid::Uuid::new_v4()));
    format!("{:x}", hasher.finalize())
}
