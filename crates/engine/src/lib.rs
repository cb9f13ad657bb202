//! # Chatrelay Engine
//!
//! The session history and prompt-continuation controller: everything that
//! happens between an accepted `/chat` request and the text returned to
//! the caller.
//!
//! Control flow per exchange:
//! history load → prompt assembly → provider call → sanitize →
//! continuation loop (bounded) → history write.

pub mod continuation;
pub mod prompt;
pub mod sanitize;

pub use continuation::{CONTINUE_INSTRUCTION, looks_truncated};
pub use sanitize::sanitize;

use chatrelay_core::error::{Error, ProviderError, Result};
use chatrelay_core::history::HistoryStore;
use chatrelay_core::message::{Conversation, Message, SessionKey};
use chatrelay_core::provider::{Provider, ProviderRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates one chat exchange end to end.
///
/// Generation settings are captured at construction; per-request input is
/// the session key, the user message, and an optional system prompt
/// override.
pub struct ChatEngine {
    provider: Arc<dyn Provider>,
    history: Arc<dyn HistoryStore>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: Option<f32>,
    window: usize,
    max_continuations: u32,
    alias: String,
    default_system_prompt: String,
    client_prompts: HashMap<String, String>,
}

impl ChatEngine {
    /// Build an engine from configuration plus the injected provider and
    /// history backend.
    pub fn from_config(
        config: &chatrelay_config::AppConfig,
        provider: Arc<dyn Provider>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            provider,
            history,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            window: config.history_window,
            max_continuations: config.max_continuations,
            alias: config.assistant_alias.clone(),
            default_system_prompt: config.effective_system_prompt(),
            client_prompts: config.client_prompts.clone(),
        }
    }

    /// Run one exchange and return the final assistant text.
    ///
    /// History is written only on success; a failed provider call leaves the
    /// stored conversation exactly as it was.
    pub async fn handle_message(
        &self,
        key: &SessionKey,
        message: &str,
        system_override: Option<&str>,
    ) -> Result<String> {
        let user_message = message.trim();
        if user_message.is_empty() {
            return Err(Error::Validation("message must not be empty".into()));
        }

        let mut conversation = self.history.load(key).await;

        let system_prompt = prompt::resolve_system_prompt(
            system_override,
            self.client_prompts.get(&key.client_id).map(String::as_str),
            &self.default_system_prompt,
        );
        prompt::ensure_system(&mut conversation, system_prompt);
        conversation.push(Message::user(user_message));
        conversation.truncate_to_window(self.window);

        let mut text = self.complete(&conversation).await?;

        // Content-driven continuation only; provider errors never retry.
        let mut attempts = 0;
        while looks_truncated(&text) && attempts < self.max_continuations {
            attempts += 1;
            debug!(session = %key, attempt = attempts, "Reply looks truncated — requesting continuation");

            conversation.push(Message::assistant(&text));
            conversation.push(Message::user(CONTINUE_INSTRUCTION));
            conversation.truncate_to_window(self.window);

            let fragment = self.complete(&conversation).await?;
            text = format!("{text}\n{fragment}").trim().to_string();
        }

        conversation.push(Message::assistant(&text));
        conversation.truncate_to_window(self.window);
        self.history.save(key, &conversation).await;

        info!(
            session = %key,
            continuations = attempts,
            reply_len = text.len(),
            "Exchange complete"
        );
        Ok(text)
    }

    /// One provider call, sanitized.
    ///
    /// A missing credential is a configuration fault, not a provider
    /// failure, so it surfaces as `Error::Config`.
    async fn complete(&self, conversation: &Conversation) -> Result<String> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages.clone(),
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            top_p: self.top_p,
        };
        let response = self.provider.complete(request).await.map_err(|e| match e {
            ProviderError::NotConfigured(message) => Error::Config { message },
            other => Error::Provider(other),
        })?;
        Ok(sanitize(response.message.content.trim(), &self.alias))
    }
}

#[cfg(test)]
mod test_helpers {
    use chatrelay_core::error::ProviderError;
    use chatrelay_core::message::Message;
    use chatrelay_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
    use std::sync::Mutex;

    /// A mock provider that replays a scripted list of outcomes and records
    /// every request it receives.
    pub struct ScriptedProvider {
        outcomes: Mutex<Vec<std::result::Result<String, ProviderError>>>,
        pub requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        pub fn new(outcomes: Vec<std::result::Result<String, ProviderError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A provider that always returns the same text.
        pub fn repeating(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);

            let mut outcomes = self.outcomes.lock().unwrap();
            // Replay the last outcome forever once the script runs out.
            let outcome = if outcomes.len() > 1 {
                outcomes.remove(0)
            } else {
                outcomes[0].clone()
            };

            outcome.map(|text| ProviderResponse {
                message: Message::assistant(text),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted-model".into(),
            })
        }
    }
}
