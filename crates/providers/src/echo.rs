//! Echo provider — deterministic offline completions for test mode.
//!
//! Returns a fixed transformation of the last user message without any
//! network call or credential. Selected via `test_mode = true`.

use async_trait::async_trait;
use chatrelay_core::error::ProviderError;
use chatrelay_core::message::{Message, Role};
use chatrelay_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// Prefix prepended to echoed replies so test output is recognizable.
const ECHO_PREFIX: &str = "[test-mode]";

/// A provider that echoes the last user message back.
#[derive(Debug, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Build the echo reply for a message sequence.
    ///
    /// A terminal period is appended when the input lacks terminal
    /// punctuation, so the reply never trips the truncation heuristic.
    fn echo_text(messages: &[Message]) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let mut reply = format!("{ECHO_PREFIX} {last_user}");
        if !matches!(reply.trim_end().chars().last(), Some('.' | '!' | '?')) {
            reply.push('.');
        }
        reply
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let content = Self::echo_text(&request.messages);
        let completion_tokens = content.len() as u32 / 4;

        Ok(ProviderResponse {
            message: Message::assistant(&content),
            usage: Some(Usage {
                prompt_tokens: 0,
                completion_tokens,
                total_tokens: completion_tokens,
            }),
            model: format!("echo/{}", request.model),
        })
    }
}
