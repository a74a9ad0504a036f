//! Session registry
//!
//! Sessions are keyed by ID. The map lock is held only long enough to look a
//! session up; each session carries its own lock so work on different
//! sessions never contends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::controller::PhaseController;
use crate::session::{IdGenerator, SessionId};
use crate::settings::GameConfig;

pub type SharedController = Arc<Mutex<PhaseController>>;

/// Lock a session, recovering the guard if a holder panicked
pub fn lock_session(session: &SharedController) -> MutexGuard<'_, PhaseController> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

pub trait SessionStore: Send + Sync {
    /// Start a new session and return its ID
    fn create(&self, config: &GameConfig, seed: Option<u64>) -> SessionId;
    fn get(&self, id: &SessionId) -> Option<SharedController>;
    fn remove(&self, id: &SessionId) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SharedController>>,
    ids: IdGenerator,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SharedController>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, config: &GameConfig, seed: Option<u64>) -> SessionId {
        let id = self.ids.next_id();
        let controller = PhaseController::new(id.clone(), config.clone(), seed);
        self.sessions()
            .insert(id.clone(), Arc::new(Mutex::new(controller)));
        log::debug!("Session {} created", id);
        id
    }

    fn get(&self, id: &SessionId) -> Option<SharedController> {
        self.sessions().get(id).cloned()
    }

    fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions().remove(id).is_some();
        if removed {
            log::debug!("Session {} removed", id);
        }
        removed
    }

    fn len(&self) -> usize {
        self.sessions().len()
    }
}
