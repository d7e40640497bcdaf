//! `weatherwise init` — Write a default config file.

use std::path::Path;
use weatherwise_config::AppConfig;

pub fn run(config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = super::config_path(config_path);

    if path.exists() && !force {
        println!("Config already exists at: {}", path.display());
        println!("   Edit it manually, or re-run with --force to overwrite.");
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;

    println!("Created config at: {}", path.display());
    println!();
    println!("Next steps:");
    println!("   1. Set WEATHERWISE_API_KEY (or add api_key to the file)");
    println!("   2. Run: weatherwise ask \"What's the weather in Paris?\"");
    println!("   3. Or:  weatherwise serve");

    Ok(())
}
