//! `chatrelay chat` — one exchange from the terminal.
//!
//! Uses the same engine as the gateway, so a terminal exchange exercises
//! the full assemble → call → sanitize → continuation path.

use chatrelay_config::AppConfig;
use chatrelay_core::message::SessionKey;
use chatrelay_engine::ChatEngine;

pub async fn run(message: &str, session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let provider = chatrelay_providers::build_from_config(&config);
    let history = chatrelay_history::build_from_config(&config).await;
    let engine = ChatEngine::from_config(&config, provider, history);

    let key = SessionKey::new(None, session.as_deref());
    let reply = engine.handle_message(&key, message, None).await?;

    println!("{reply}");
    tracing::debug!(session = %key, "Session id for follow-up messages");
    Ok(())
}
