use crate::{Session, SessionConfig};
use bj_core::ConfigError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// Independent sessions keyed by id. Each session sits behind its own lock so rounds of one session are
/// serialized while different sessions progress in parallel.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> SessionRegistry {
        SessionRegistry::default()
    }

    /// Builds a session from `config` and registers it under a fresh id.
    pub fn create(&self, config: SessionConfig) -> Result<(Uuid, Arc<Mutex<Session>>), ConfigError> {
        let session = Session::new(config)?;
        Ok(self.insert(session))
    }

    pub fn insert(&self, session: Session) -> (Uuid, Arc<Mutex<Session>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(id, session.clone());
        info!(%id, active = sessions.len(), "session created");
        (id, session)
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        if removed.is_some() {
            info!(%id, "session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
