//! `chatrelay status` — print the effective configuration snapshot.
//!
//! Mirrors what `GET /info` reports; secrets stay redacted.

use chatrelay_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let snapshot = serde_json::json!({
        "model": config.model,
        "api_url": config.api_url,
        "api_key_set": config.has_api_key(),
        "test_mode": config.test_mode,
        "history_window": config.history_window,
        "max_continuations": config.max_continuations,
        "max_tokens": config.max_tokens,
        "persistence": if config.redis_url.is_some() { "redis" } else { "memory" },
        "gateway": format!("{}:{}", config.gateway.host, config.gateway.port),
    });

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
