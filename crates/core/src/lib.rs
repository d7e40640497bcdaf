//! # Weatherwise Core
//!
//! Domain types, traits, and error definitions for the Weatherwise
//! tool-augmented question-answering agent. This crate has **no framework
//! dependencies**; it defines the model every other crate implements against.
//!
//! - [`message`]: roles, messages, and the per-question conversation buffer
//! - [`provider`]: the chat-model boundary
//! - [`tool`]: capabilities, their results, and the startup-time registry

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ConversationError, Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice, ToolDefinition, Usage};
pub use tool::{Tool, ToolRegistry, ToolResult};
