//! The agent loop — the heart of Weatherwise.
//!
//! Answering a question takes at most two model rounds:
//!
//! 1. **Ask** the model with the conversation and the tool catalogue
//! 2. **If tool calls**: dispatch each one in order, append the results
//! 3. **Ask again** with the tool results in view and return that answer
//!
//! If round 1 answers directly, round 2 never happens.

pub mod handler;
pub mod loop_runner;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use handler::{AskError, QuestionHandler};
pub use loop_runner::{AgentAnswer, AgentLoop};
