//! Session Store: per-conversation agent handle and memory.
//!
//! Entries are created lazily and removed on explicit reset. Each entry sits
//! behind its own async mutex; holding it for a whole reasoning run is what
//! serialises concurrent requests on one session id.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use super::memory::ChatMemory;
use super::react::ReactAgent;

pub struct Session {
    pub agent: Arc<ReactAgent>,
    pub memory: ChatMemory,
}

pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
    agent: Arc<ReactAgent>,
    memory_token_limit: usize,
}

impl SessionStore {
    pub fn new(agent: Arc<ReactAgent>, memory_token_limit: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            agent,
            memory_token_limit,
        }
    }

    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("Created new agent session: {session_id}");
                Arc::new(Mutex::new(Session {
                    agent: self.agent.clone(),
                    memory: ChatMemory::new(self.memory_token_limit),
                }))
            })
            .clone()
    }

    /// Removes a session. Unknown ids are a no-op.
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        info!("Session cleared: {session_id} (existed: {removed})");
        removed
    }

    #[cfg(test)]
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
