//! `weatherwise ask` — Answer one question and print `{answer, tool_used}`.

use anyhow::Context;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, question: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    super::require_api_key(&config)?;

    let provider = weatherwise_providers::build_from_config(&config)
        .context("Failed to build model provider")?;
    let handler = weatherwise_gateway::build_question_handler(&config, provider)?;

    let answer = handler.ask(question).await?;
    println!("{}", serde_json::to_string_pretty(&answer)?);

    Ok(())
}
