//! Gloss - import, export and clean up Apache Atlas business glossaries.

mod commands;
mod logging;
mod report;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

use gloss_core::Config;

#[derive(Debug, Parser)]
#[command(name = "gloss")]
#[command(version, about = "Business glossary CSV importer for Apache Atlas", long_about = None)]
struct Cli {
    /// Configuration file (YAML or TOML). Defaults to ./gloss.yaml, ./config.yaml
    /// or the user config directory.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import a business glossary from a CSV file
    Import(commands::import::ImportArgs),
    /// List glossaries with their categories and terms
    Export,
    /// Delete glossaries from Atlas
    Cleanup(commands::cleanup::CleanupArgs),
    /// Print the default configuration
    Config,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON on stdout.
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", Config::default_config_string());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Commands::Import(args) = &cli.command {
        args.apply(&mut config);
    }

    let _log_guard = logging::init(&config.import.log_level, config.import.log_file.as_deref())?;
    tracing::debug!(base_url = %config.atlas.base_url, "Configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Import(args) => commands::import::execute(args, config, cli.format).await,
            Commands::Export => commands::export::execute(&config, cli.format).await,
            Commands::Cleanup(args) => commands::cleanup::execute(args, &config, cli.format).await,
            Commands::Config => Ok(()),
        }
    })
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().wrap_err("Failed to load configuration")?,
    };
    Ok(config)
}
