//! MCP `ServerHandler` over the tool registry.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use weatherwise_core::message::MessageToolCall;
use weatherwise_core::tool::ToolResult;
use weatherwise_tools::ToolDispatcher;

/// Name reported to clients during the MCP handshake.
pub const SERVER_NAME: &str = "Weather MCP Server";

/// Exposes every registered tool to MCP clients.
///
/// Calls go through the same [`ToolDispatcher`] the agent loop uses, so a
/// tool that fails, panics or hangs comes back as an error result rather
/// than tearing down the session.
#[derive(Clone)]
pub struct WeatherMcpServer {
    dispatcher: Arc<ToolDispatcher>,
}

impl WeatherMcpServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// The registry's definitions in MCP form.
    pub fn catalogue(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .definitions()
            .into_iter()
            .map(|def| {
                let schema = match def.parameters {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(def.name, def.description, schema)
            })
            .collect()
    }
}

impl ServerHandler for WeatherMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some("Call get_weather with a city name for its current weather.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.catalogue()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let name = request.name.to_string();
        if self.dispatcher.registry().get(&name).is_none() {
            warn!(tool = %name, "MCP client requested an unknown tool");
            return Err(ErrorData::invalid_params(format!("Unknown tool: {name}"), None));
        }

        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));
        let call = MessageToolCall {
            id: format!("mcp-{}", Uuid::new_v4()),
            name,
            arguments: arguments.to_string(),
        };
        info!(tool = %call.name, call_id = %call.id, "MCP tool call");

        Ok(match self.dispatcher.dispatch(&call).await {
            ToolResult::Success(value) => CallToolResult::success(vec![Content::text(value.to_string())]),
            failure => CallToolResult::error(vec![Content::text(failure.to_content())]),
        })
    }
}
