//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the entire system:
//! a caller posts a message → the engine assembles a prompt → the provider
//! generates a reply → the exchange is appended to the session's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client identifier used when the caller does not supply one.
pub const DEFAULT_CLIENT_ID: &str = "public";

/// Identifies one conversation thread: an opaque client id plus a session id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub client_id: String,
    pub session_id: String,
}

impl SessionKey {
    /// Build a key from optional caller-supplied identifiers.
    ///
    /// A missing client id falls back to [`DEFAULT_CLIENT_ID`]; a missing
    /// session id gets a freshly generated one.
    pub fn new(client_id: Option<&str>, session_id: Option<&str>) -> Self {
        let client_id = match client_id {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => DEFAULT_CLIENT_ID.to_string(),
        };
        let session_id = match session_id {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => Self::generate_session_id(),
        };
        Self {
            client_id,
            session_id,
        }
    }

    /// Generate a short session id: `sess_` + 8 hex chars.
    pub fn generate_session_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("sess_{}", &hex[..8])
    }

    /// The storage key string used by history backends.
    pub fn storage_key(&self) -> String {
        format!("hist:{}:{}", self.client_id, self.session_id)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.client_id, self.session_id)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, rules)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A single message in a conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// An ordered sequence of messages for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Ordered messages
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Whether the conversation starts with a system message.
    pub fn starts_with_system(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == Role::System)
    }

    /// Truncate to the most recent `window` messages.
    ///
    /// Invariant: a leading system message survives truncation; the window
    /// then covers the system message plus the last `window - 1` others.
    pub fn truncate_to_window(&mut self, window: usize) {
        if self.messages.len() <= window {
            return;
        }
        if self.starts_with_system() {
            let keep_tail = window.saturating_sub(1);
            let drain_end = self.messages.len() - keep_tail;
            self.messages.drain(1..drain_end);
        } else {
            let drain_end = self.messages.len() - window;
            self.messages.drain(..drain_end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello there");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello there");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::system("Be concise.");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.role, Role::System);
        assert_eq!(parsed.content, "Be concise.");
    }

    #[test]
    fn session_key_defaults() {
        let key = SessionKey::new(None, Some("s1"));
        assert_eq!(key.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(key.session_id, "s1");
        assert_eq!(key.storage_key(), "hist:public:s1");
    }

    #[test]
    fn session_key_generates_session_id() {
        let key = SessionKey::new(Some("acme"), None);
        assert!(key.session_id.starts_with("sess_"));
        assert_eq!(key.session_id.len(), "sess_".len() + 8);
    }

    #[test]
    fn blank_identifiers_treated_as_missing() {
        let key = SessionKey::new(Some("  "), Some(""));
        assert_eq!(key.client_id, DEFAULT_CLIENT_ID);
        assert!(key.session_id.starts_with("sess_"));
    }

    #[test]
    fn window_no_op_when_within_bounds() {
        let mut conv = Conversation::new();
        conv.push(Message::system("sys"));
        conv.push(Message::user("u1"));
        conv.truncate_to_window(5);
        assert_eq!(conv.len(), 2);
    }

    #[test]
    fn window_keeps_system_and_tail() {
        let mut conv = Conversation::new();
        conv.push(Message::system("sys"));
        for i in 0..10 {
            conv.push(Message::user(format!("u{i}")));
        }
        conv.truncate_to_window(4);
        assert_eq!(conv.len(), 4);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[1].content, "u7");
        assert_eq!(conv.messages[3].content, "u9");
    }

    #[test]
    fn window_without_system_keeps_tail() {
        let mut conv = Conversation::new();
        for i in 0..6 {
            conv.push(Message::user(format!("u{i}")));
        }
        conv.truncate_to_window(3);
        assert_eq!(conv.len(), 3);
        assert_eq!(conv.messages[0].content, "u3");
    }

    #[test]
    fn window_of_one_degenerates_to_system_only() {
        let mut conv = Conversation::new();
        conv.push(Message::system("sys"));
        conv.push(Message::user("u"));
        conv.push(Message::assistant("a"));
        conv.truncate_to_window(1);
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages[0].role, Role::System);
    }
}
