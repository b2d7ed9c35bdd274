//! Sitesmith CLI - generate a static website from a single prompt.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sitesmith")]
#[command(about = "Generate a static website from a single prompt")]
#[command(version)]
pub struct Cli {
    /// What the website should be about
    #[arg(short, long)]
    prompt: Option<String>,

    /// Output directory (defaults to config or "output_website")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to sitesmith.toml config file
    #[arg(short, long, default_value = "sitesmith.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(true).init();

    let env = |name: &str| std::env::var(name).ok();

    let api_key = config::api_key(env).map_err(|e| {
        tracing::error!("API configuration error: {}", e);
        e
    })?;
    tracing::info!("API key configured");

    let file_config = config::load_config(&cli.config)?;
    let settings = config::resolve(
        file_config,
        config::Overrides {
            prompt: cli.prompt,
            output: cli.output,
        },
        env,
    );

    commands::generate::run(settings, api_key).await
}
