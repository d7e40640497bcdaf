//! MCP tool server for Weatherwise.
//!
//! Serves the built-in tools to any MCP client over streamable HTTP at
//! [`MCP_PATH`]. No model is involved; clients call `get_weather` directly.

pub mod server;

use axum::Router;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use weatherwise_config::AppConfig;
use weatherwise_core::error::ToolError;
use weatherwise_tools::ToolDispatcher;

pub use server::{SERVER_NAME, WeatherMcpServer};

/// Route the MCP endpoint is mounted on.
pub const MCP_PATH: &str = "/mcp";

/// The default registry behind a dispatcher bounded by `[agent] tool_timeout_secs`.
pub fn build_dispatcher(config: &AppConfig) -> Result<Arc<ToolDispatcher>, ToolError> {
    let registry = weatherwise_tools::default_registry()?;
    Ok(Arc::new(ToolDispatcher::new(
        Arc::new(registry),
        Duration::from_secs(config.agent.tool_timeout_secs),
    )))
}

/// Build the Axum router serving MCP sessions. Each session gets its own
/// handler; all of them share `dispatcher`.
pub fn build_router(dispatcher: Arc<ToolDispatcher>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(WeatherMcpServer::new(dispatcher.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .nest_service(MCP_PATH, service)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the MCP server on `[mcp] host:port`.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", config.mcp.host, config.mcp.port);
    let dispatcher = build_dispatcher(&config)?;

    info!(
        tools = ?dispatcher.registry().names(),
        "MCP tools ready"
    );

    let app = build_router(dispatcher);

    info!(addr = %addr, path = MCP_PATH, "MCP server starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
