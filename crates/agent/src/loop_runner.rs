//! The agent reasoning loop implementation.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use weatherwise_core::message::{Conversation, Message};
use weatherwise_core::provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice};
use weatherwise_tools::ToolDispatcher;

/// The outcome of one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentAnswer {
    /// The model's final text; `None` if the model produced no content
    pub answer: Option<String>,

    /// Whether any tool was dispatched while answering
    pub tool_used: bool,
}

/// The agent loop that orchestrates LLM calls and tool execution.
///
/// At most one tool-resolution cycle runs per question: tool calls requested
/// in round 2 are logged and not executed.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting; provider default when unset
    temperature: Option<f32>,

    /// Max tokens per response
    max_tokens: Option<u32>,

    /// Tool catalogue and executor
    dispatcher: Arc<ToolDispatcher>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        dispatcher: Arc<ToolDispatcher>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            dispatcher,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn request(&self, conversation: &Conversation, tool_choice: Option<ToolChoice>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages().to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: self.dispatcher.registry().definitions(),
            tool_choice,
        }
    }

    async fn call_model(
        &self,
        conversation: &Conversation,
        tool_choice: Option<ToolChoice>,
        round: u8,
    ) -> Result<ProviderResponse, weatherwise_core::Error> {
        let response = self
            .provider
            .complete(self.request(conversation, tool_choice))
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                round,
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Model usage"
            );
        }

        Ok(response)
    }

    /// Answer the question held by a seeded conversation.
    ///
    /// 1. Round 1: call the model with the tool catalogue, `tool_choice = auto`
    /// 2. No tool calls: the reply is the answer
    /// 3. Otherwise dispatch every call in order and append its result
    /// 4. Round 2: call the model again and return its content verbatim
    ///
    /// Provider failures on either round propagate; tool failures never do.
    #[tracing::instrument(
        name = "agent_loop",
        skip_all,
        fields(conversation_id = %conversation.id, model = %self.model)
    )]
    pub async fn process(
        &self,
        conversation: &mut Conversation,
    ) -> Result<AgentAnswer, weatherwise_core::Error> {
        info!(messages = conversation.len(), "Processing conversation");

        let first = self
            .call_model(conversation, Some(ToolChoice::Auto), 1)
            .await?;

        if !first.message.has_tool_calls() {
            debug!("Model answered without tools");
            let answer = first.message.content.clone();
            conversation.push(first.message)?;
            return Ok(AgentAnswer {
                answer,
                tool_used: false,
            });
        }

        let tool_calls = first.message.tool_calls.clone();
        debug!(tool_count = tool_calls.len(), "Executing tool calls");
        conversation.push(first.message)?;

        for call in &tool_calls {
            let result = self.dispatcher.dispatch(call).await;
            info!(tool = %call.name, call_id = %call.id, success = result.is_success(), "Tool dispatched");
            conversation.push(Message::tool_result(&call.id, result.to_content()))?;
        }

        let second = self.call_model(conversation, None, 2).await?;

        if second.message.has_tool_calls() {
            warn!(
                requested = second.message.tool_calls.len(),
                "Model requested tools again after the tool round; not executing"
            );
        }

        let answer = second.message.content.clone();
        conversation.push(second.message)?;

        Ok(AgentAnswer {
            answer,
            tool_used: true,
        })
    }
}
