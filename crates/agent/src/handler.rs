//! Question handler — validates an inbound question and runs the loop once.

use std::sync::Arc;
use tracing::{error, info};
use weatherwise_core::message::Conversation;

use crate::loop_runner::{AgentAnswer, AgentLoop};

/// Why a question could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    /// The request itself is unusable; a client error.
    #[error("Question must not be empty")]
    InvalidQuestion,

    /// The agent loop failed; a server error carrying the failure's description.
    #[error("{0}")]
    Agent(String),
}

/// Entry point for one question: seeds a fresh conversation and answers it.
pub struct QuestionHandler {
    agent: Arc<AgentLoop>,
    system_prompt: String,
}

impl QuestionHandler {
    pub fn new(agent: Arc<AgentLoop>, system_prompt: impl Into<String>) -> Self {
        Self {
            agent,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn agent(&self) -> &AgentLoop {
        &self.agent
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Answer a question. Whitespace-only questions are rejected before any
    /// model call is made.
    pub async fn ask(&self, question: &str) -> Result<AgentAnswer, AskError> {
        if question.trim().is_empty() {
            return Err(AskError::InvalidQuestion);
        }

        let mut conversation = Conversation::seeded(&self.system_prompt, question);
        let conversation_id = conversation.id.clone();
        info!(%conversation_id, "Answering question");

        self.agent.process(&mut conversation).await.map_err(|e| {
            error!(%conversation_id, error = %e, "Agent loop failed");
            AskError::Agent(e.to_string())
        })
    }
}
