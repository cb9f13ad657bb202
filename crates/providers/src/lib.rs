//! Inference provider implementations for chatrelay.
//!
//! Both providers implement the `chatrelay_core::Provider` trait.
//! `build_from_config` selects the backend: the deterministic echo when
//! test mode is on, otherwise the OpenAI-compatible HTTP provider.

pub mod echo;
pub mod openai_compat;

pub use echo::EchoProvider;
pub use openai_compat::OpenAiCompatProvider;

use chatrelay_core::Provider;
use std::sync::Arc;

/// Build the provider selected by configuration.
///
/// Test mode needs no credential; the HTTP provider carries whatever key is
/// configured (possibly none) and refuses to make network calls without one.
pub fn build_from_config(config: &chatrelay_config::AppConfig) -> Arc<dyn Provider> {
    if config.test_mode {
        tracing::info!("Test mode enabled — using deterministic echo provider");
        Arc::new(EchoProvider::new())
    } else {
        Arc::new(OpenAiCompatProvider::new(
            "groq",
            config.api_url.clone(),
            config.api_key.clone().unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selects_echo() {
        let config = chatrelay_config::AppConfig {
            test_mode: true,
            ..Default::default()
        };
        let provider = build_from_config(&config);
        assert_eq!(provider.name(), "echo");
    }

    #[test]
    fn default_config_selects_http_provider() {
        let config = chatrelay_config::AppConfig::default();
        let provider = build_from_config(&config);
        assert_eq!(provider.name(), "groq");
    }
}
