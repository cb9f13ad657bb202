//! History trait — session-scoped conversation storage.
//!
//! History backends are infallible from the caller's point of view: a
//! missing key loads as an empty conversation, and a failing store
//! degrades internally rather than surfacing errors.

use crate::message::{Conversation, SessionKey};
use async_trait::async_trait;

/// Session history storage.
///
/// Implementations: in-memory map, Redis with time-based expiry.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "memory", "redis"), reported by `GET /info`.
    fn backend(&self) -> &str;

    /// Load the conversation for a session key. Empty if absent.
    async fn load(&self, key: &SessionKey) -> Conversation;

    /// Overwrite the conversation for a session key.
    async fn save(&self, key: &SessionKey, conversation: &Conversation);
}
