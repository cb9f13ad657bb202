//! In-memory history backend — the default, and the degradation target
//! when Redis is unavailable. History lives for the process lifetime only.

use async_trait::async_trait;
use chatrelay_core::history::HistoryStore;
use chatrelay_core::message::{Conversation, SessionKey};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory history backend keyed by the session storage key.
///
/// Individual load/save operations are consistent, but a full exchange is a
/// read-modify-write with no cross-operation lock: concurrent writers to
/// the same session key interleave last-writer-wins. Sessions are assumed
/// single-client, which makes that acceptable here.
pub struct InMemoryHistory {
    sessions: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of tracked sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn load(&self, key: &SessionKey) -> Conversation {
        self.sessions
            .read()
            .await
            .get(&key.storage_key())
            .cloned()
            .unwrap_or_default()
    }

    async fn save(&self, key: &SessionKey, conversation: &Conversation) {
        self.sessions
            .write()
            .await
            .insert(key.storage_key(), conversation.clone());
    }
}
