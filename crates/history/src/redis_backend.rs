//! Redis history backend — conversations stored as JSON with a 24h expiry.
//!
//! Every operation that touches Redis can fail; all failures are logged at
//! warn level and the operation is served from an owned in-memory fallback
//! instead. Callers never see a history error.

use crate::in_memory::InMemoryHistory;
use async_trait::async_trait;
use chatrelay_core::history::HistoryStore;
use chatrelay_core::message::{Conversation, SessionKey};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::warn;

/// Seconds a stored conversation survives without being rewritten.
const HISTORY_TTL_SECS: u64 = 60 * 60 * 24;

/// History backend over a Redis key/value service.
pub struct RedisHistory {
    conn: ConnectionManager,
    fallback: InMemoryHistory,
}

impl RedisHistory {
    /// Connect to Redis. Fails only at startup; after that the backend
    /// degrades per-operation instead of erroring.
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self {
            conn,
            fallback: InMemoryHistory::new(),
        })
    }

    async fn try_load(&self, storage_key: &str) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.conn.clone();
        conn.get(storage_key).await
    }

    async fn try_save(&self, storage_key: &str, json: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.conn.clone();
        conn.set_ex(storage_key, json, HISTORY_TTL_SECS).await
    }
}

#[async_trait]
impl HistoryStore for RedisHistory {
    fn backend(&self) -> &str {
        "redis"
    }

    async fn load(&self, key: &SessionKey) -> Conversation {
        let storage_key = key.storage_key();
        match self.try_load(&storage_key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(conversation) => conversation,
                Err(e) => {
                    warn!(session = %key, error = %e, "Discarding undecodable stored history");
                    Conversation::new()
                }
            },
            Ok(None) => self.fallback.load(key).await,
            Err(e) => {
                warn!(session = %key, error = %e, "Redis load failed — using in-memory fallback");
                self.fallback.load(key).await
            }
        }
    }

    async fn save(&self, key: &SessionKey, conversation: &Conversation) {
        let storage_key = key.storage_key();
        let json = match serde_json::to_string(conversation) {
            Ok(json) => json,
            Err(e) => {
                warn!(session = %key, error = %e, "Failed to encode history — dropping write");
                return;
            }
        };

        if let Err(e) = self.try_save(&storage_key, &json).await {
            warn!(session = %key, error = %e, "Redis save failed — using in-memory fallback");
            self.fallback.save(key, conversation).await;
        }
    }
}
