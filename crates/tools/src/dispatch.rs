//! Tool dispatcher — the boundary between the agent loop and capabilities.
//!
//! Every call produces a [`ToolResult`]. Malformed arguments, unknown names,
//! tool errors, panics, and hangs all come back as `{"error": ...}` records
//! the model can read, so a failing capability degrades the answer instead
//! of aborting the request.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::task::AbortOnDropHandle;
use tracing::{debug, warn};
use weatherwise_core::error::ToolError;
use weatherwise_core::message::MessageToolCall;
use weatherwise_core::tool::{ToolRegistry, ToolResult};

/// Error text returned when the model names a tool that is not registered.
pub const UNKNOWN_FUNCTION: &str = "Unknown function";

/// Executes model-requested tool calls against a [`ToolRegistry`].
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool call to completion, or to its time bound.
    ///
    /// The tool runs on its own task. Dropping the returned future aborts it.
    pub async fn dispatch(&self, call: &MessageToolCall) -> ToolResult {
        let arguments = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Malformed tool arguments");
                return ToolResult::failure(e.to_string());
            }
        };

        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, call_id = %call.id, "Model requested an unknown tool");
            return ToolResult::failure(UNKNOWN_FUNCTION);
        };

        let start = Instant::now();
        let mut handle =
            AbortOnDropHandle::new(tokio::spawn(async move { tool.execute(arguments).await }));

        let result = match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(Ok(value))) => ToolResult::Success(value),
            Ok(Ok(Err(e))) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                ToolResult::failure(error_message(e))
            }
            Ok(Err(join_error)) => {
                warn!(tool = %call.name, error = %join_error, "Tool task crashed");
                ToolResult::failure(format!("Tool '{}' crashed: {join_error}", call.name))
            }
            Err(_) => {
                handle.abort();
                let err = ToolError::Timeout {
                    tool_name: call.name.clone(),
                    timeout: self.timeout,
                };
                warn!(tool = %call.name, "{err}");
                ToolResult::failure(err.to_string())
            }
        };

        debug!(
            tool = %call.name,
            call_id = %call.id,
            success = result.is_success(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool call finished"
        );

        result
    }
}

/// Tool arguments arrive as a JSON string. An empty string means no arguments.
fn parse_arguments(raw: &str) -> Result<serde_json::Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ToolError::InvalidArguments(format!("arguments are not valid JSON: {e}")))?;

    if !value.is_object() {
        return Err(ToolError::InvalidArguments(
            "arguments must be a JSON object".into(),
        ));
    }

    Ok(value)
}

/// Execution failures carry a message meant for the model; everything else
/// uses the error's display form.
fn error_message(err: ToolError) -> String {
    match err {
        ToolError::ExecutionFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}
