//! Application state for the web server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use tabprep::{Session, TabprepConfig};

use super::error::ApiError;

/// One session behind its own lock.
pub type SharedSession = Arc<RwLock<Session>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions by id. Held only long enough to look one up.
    pub sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
    /// Defaults for new sessions.
    pub config: Arc<TabprepConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: TabprepConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    /// Register a session and return its id.
    pub async fn insert(&self, session: Session) -> String {
        let id = session.id().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(RwLock::new(session)));
        id
    }

    /// Look up a session.
    pub async fn session(&self, id: &str) -> Result<SharedSession, ApiError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", id)))
    }

    /// Drop a session. Returns false if it did not exist.
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }
}
