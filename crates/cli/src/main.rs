//! Weatherwise CLI — the main entry point.
//!
//! Commands:
//! - `serve` — Start the HTTP API server
//! - `mcp`   — Serve the tools to MCP clients over streamable HTTP
//! - `ask`   — Answer a single question and print the JSON result
//! - `tools` — List the tools offered to the model
//! - `init`  — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "weatherwise",
    about = "Weatherwise — a weather expert agent with tool calling",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.weatherwise/config.toml)
    #[arg(short, long, global = true, env = "WEATHERWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Serve the tools to MCP clients over streamable HTTP
    Mcp {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question
    Ask {
        /// The question to answer
        question: String,
    },

    /// List the tools offered to the model
    Tools,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(config_path, host, port).await?,
        Commands::Mcp { host, port } => commands::mcp::run(config_path, host, port).await?,
        Commands::Ask { question } => commands::ask::run(config_path, &question).await?,
        Commands::Tools => commands::tools::run()?,
        Commands::Init { force } => commands::init::run(config_path, force)?,
    }

    Ok(())
}
