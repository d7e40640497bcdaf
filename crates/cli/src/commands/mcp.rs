//! `weatherwise mcp` — Serve the tools to MCP clients.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;

    if let Some(host) = host_override {
        config.mcp.host = host;
    }
    if let Some(port) = port_override {
        config.mcp.port = port;
    }

    println!("{}", weatherwise_mcp::SERVER_NAME);
    println!(
        "   Endpoint:  http://{}:{}{}",
        config.mcp.host,
        config.mcp.port,
        weatherwise_mcp::MCP_PATH
    );

    weatherwise_mcp::start(config)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
