use log::{error, info, warn};

use crate::storage::KeyValueStore;

use super::models::InterviewSession;

pub const SESSIONS_KEY: &str = "interview-sessions";

/// The user's interview sessions, pinned first, mirrored to a key-value store.
///
/// The in-memory list is the source of truth. Every mutation rewrites the
/// whole list under [`SESSIONS_KEY`]; a failed write is logged and the list
/// keeps its new state.
pub struct SessionStore<S> {
    storage: S,
    sessions: Vec<InterviewSession>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn open(storage: S) -> Self {
        let sessions = Self::read_sessions(&storage);
        Self { storage, sessions }
    }

    /// Re-reads the persisted list, replacing what is in memory.
    pub fn load(&mut self) -> &[InterviewSession] {
        self.sessions = Self::read_sessions(&self.storage);
        &self.sessions
    }

    pub fn sessions(&self) -> &[InterviewSession] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&InterviewSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add(&mut self, session: InterviewSession) {
        info!("💾 Adding session {} ({})", session.id, session.target_role);
        self.sessions.push(session);
        partition_pinned(&mut self.sessions);
        self.persist();
    }

    /// Returns whether a session was removed. Unknown ids change nothing.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            warn!("⚠️ Delete ignored, no session with id {}", id);
            return false;
        }
        self.persist();
        true
    }

    /// Flips `pinned` and returns the new value, or `None` for an unknown id.
    pub fn toggle_pin(&mut self, id: &str) -> Option<bool> {
        let session = self.sessions.iter_mut().find(|s| s.id == id)?;
        session.pinned = !session.pinned;
        let pinned = session.pinned;

        partition_pinned(&mut self.sessions);
        self.persist();
        Some(pinned)
    }

    /// Replaces the session with the same id in place. Unknown ids change nothing.
    pub fn update(&mut self, session: InterviewSession) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(slot) => *slot = session,
            None => {
                warn!("⚠️ Update ignored, no session with id {}", session.id);
                return false;
            }
        }
        partition_pinned(&mut self.sessions);
        self.persist();
        true
    }

    fn read_sessions(storage: &S) -> Vec<InterviewSession> {
        let stored = match storage.get(SESSIONS_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("❌ Error loading sessions: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<InterviewSession>>(&stored) {
            Ok(sessions) => {
                info!("📋 Loaded {} stored sessions", sessions.len());
                sessions
            }
            Err(e) => {
                error!("❌ Error parsing stored sessions: {}", e);
                Vec::new()
            }
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.sessions)
            .map_err(crate::storage::StorageError::from)
            .and_then(|json| self.storage.set(SESSIONS_KEY, &json));

        if let Err(e) = result {
            error!("❌ Error saving sessions: {}", e);
        }
    }
}

/// Pinned sessions first. `sort_by_key` is stable, so each group keeps its order.
fn partition_pinned(sessions: &mut [InterviewSession]) {
    sessions.sort_by_key(|s| !s.pinned);
}
