//! LLM Provider implementations for Weatherwise.
//!
//! All providers implement the `weatherwise_core::Provider` trait.
//! The factory builds the configured provider at startup.

pub mod factory;
pub mod openai_compat;

pub use factory::{build_from_config, is_local};
pub use openai_compat::OpenAiCompatProvider;
