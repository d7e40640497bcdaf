//! `weatherwise serve` — Start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    super::require_api_key(&config)?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Weatherwise Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model);

    weatherwise_gateway::start(config)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
