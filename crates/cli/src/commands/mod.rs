pub mod ask;
pub mod init;
pub mod mcp;
pub mod serve;
pub mod tools;

use anyhow::Context;
use std::path::{Path, PathBuf};
use weatherwise_config::AppConfig;

/// The config file `path` points at, or the default location.
pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Load config with `.env` and environment overrides applied.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = config_path(path);
    AppConfig::load_with_overrides(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Fail early with setup instructions when no key is available.
pub fn require_api_key(config: &AppConfig) -> anyhow::Result<()> {
    if config.has_api_key() || weatherwise_providers::is_local(&config.provider) {
        return Ok(());
    }

    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables (or put it in .env):");
    eprintln!("    WEATHERWISE_API_KEY=sk-...");
    eprintln!("    OPENAI_API_KEY=sk-...");
    eprintln!();
    eprintln!("  Or add `api_key` to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    anyhow::bail!("No API key found. See above for setup instructions.")
}
