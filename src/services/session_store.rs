use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime, Utc};

use crate::models::BookingDraft;

/// Shared handle to one session's draft. Holding the lock serializes turns for that session.
pub type SessionHandle = Arc<tokio::sync::Mutex<BookingDraft>>;

struct SessionEntry {
    draft: SessionHandle,
    last_activity: NaiveDateTime,
}

/// In-memory session id -> draft map with idle expiry.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the draft for `session_id`, creating a fresh one in `Start` if it is
    /// unknown or has been idle longer than the TTL.
    pub fn get_context(&self, session_id: &str) -> SessionHandle {
        self.get_context_at(session_id, Utc::now().naive_utc())
    }

    pub(crate) fn get_context_at(&self, session_id: &str, now: NaiveDateTime) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap();

        if let Some(entry) = sessions.get_mut(session_id) {
            if now - entry.last_activity <= self.ttl {
                entry.last_activity = now;
                return Arc::clone(&entry.draft);
            }
            tracing::debug!(session_id, "session expired, starting over");
        }

        let draft: SessionHandle = Arc::new(tokio::sync::Mutex::new(BookingDraft::new()));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                draft: Arc::clone(&draft),
                last_activity: now,
            },
        );
        draft
    }

    /// Drops a session explicitly. Returns whether it existed.
    pub fn expire_session(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().remove(session_id).is_some()
    }

    /// Evicts every session idle longer than the TTL.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now().naive_utc())
    }

    pub(crate) fn sweep_expired_at(&self, now: NaiveDateTime) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_activity <= self.ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
