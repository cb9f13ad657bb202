//! Prompt assembly — system message placement and prompt resolution.
//!
//! Pure functions so the assembly rules are testable in isolation.

use chatrelay_core::message::{Conversation, Message};

/// Pick the system prompt for an exchange.
///
/// Priority: request-supplied override, then the per-client default, then
/// the global default. Blank overrides are treated as absent.
pub fn resolve_system_prompt<'a>(
    request_override: Option<&'a str>,
    client_default: Option<&'a str>,
    global_default: &'a str,
) -> &'a str {
    request_override
        .filter(|s| !s.trim().is_empty())
        .or(client_default)
        .unwrap_or(global_default)
}

/// Ensure the conversation starts with a system message.
///
/// Inserts `prompt` at index 0 only when no leading system message exists;
/// an established conversation keeps its original system message even if a
/// different prompt arrives on a later request.
pub fn ensure_system(conversation: &mut Conversation, prompt: &str) {
    if !conversation.starts_with_system() {
        conversation.messages.insert(0, Message::system(prompt));
    }
}
