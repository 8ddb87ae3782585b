//! plagscan CLI - Find similar submissions in a batch of documents.

use clap::Parser;
use plagscan_cli::commands;
use plagscan_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> plagscan_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so table and JSON output stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config_path = cli.config.as_deref();

    // `config init` and `config path` must work even when the file is broken
    let config = match &cli.command {
        Command::Config(_) => Config::load(config_path).unwrap_or_default(),
        _ => Config::load(config_path)?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config.engine, &formatter).await?;
        }
        Command::Suspects(args) => {
            commands::execute_suspects(args, &config.engine, &formatter).await?;
        }
        Command::Fragments(args) => {
            commands::execute_fragments(args, &config.engine, &formatter).await?;
        }
        Command::Classify(args) => {
            commands::execute_classify(args, &config.engine, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, config_path, format, &formatter)?;
        }
    }

    Ok(())
}
