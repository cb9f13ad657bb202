//! `chatrelay serve` — start the HTTP gateway.

use chatrelay_config::AppConfig;

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(port) = port {
        config.gateway.port = port;
    }

    chatrelay_gateway::start(config).await
}
