//! Tool trait — the abstraction over capabilities the model may invoke.
//!
//! A tool bundles its model-facing signature (name, description, JSON schema)
//! with the typed handler that executes it, so the registry can never
//! advertise a name it cannot dispatch.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// The outcome of one capability invocation, as fed back to the model.
///
/// Serializes to the capability's JSON record on success and to
/// `{"error": "<message>"}` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Success(serde_json::Value),
    Failure { error: String },
}

impl ToolResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// JSON text used as the content of the tool message.
    pub fn to_content(&self) -> String {
        match self {
            Self::Success(value) => value.to_string(),
            Self::Failure { error } => serde_json::json!({ "error": error }).to_string(),
        }
    }
}

/// The core Tool trait.
///
/// Tools are registered once in the [`ToolRegistry`] at startup and invoked
/// through the dispatcher, which turns every failure into a [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "get_weather").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with already-parsed arguments.
    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// An ordered, read-only-after-startup registry of tools.
///
/// Definitions are exposed in registration order on every model call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool after validating its parameter schema.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.get(&name).is_some() {
            return Err(ToolError::Duplicate(name));
        }
        validate_schema(&name, &tool.parameters_schema())?;
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// All tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The provider needs an object schema with named properties and a
/// `required` list drawn from those properties.
fn validate_schema(tool_name: &str, schema: &serde_json::Value) -> Result<(), ToolError> {
    let invalid = |reason: &str| ToolError::InvalidSchema {
        tool_name: tool_name.to_string(),
        reason: reason.to_string(),
    };

    if schema.get("type").and_then(|t| t.as_str()) != Some("object") {
        return Err(invalid("top-level type must be \"object\""));
    }

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .ok_or_else(|| invalid("\"properties\" must be an object"))?;

    if let Some(required) = schema.get("required") {
        let required = required
            .as_array()
            .ok_or_else(|| invalid("\"required\" must be an array"))?;
        for field in required {
            let field = field
                .as_str()
                .ok_or_else(|| invalid("\"required\" entries must be strings"))?;
            if !properties.contains_key(field) {
                return Err(invalid(&format!(
                    "required field '{field}' is not a declared property"
                )));
            }
        }
    }

    Ok(())
}
