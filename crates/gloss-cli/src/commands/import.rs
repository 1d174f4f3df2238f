//! Import command.

use clap::Args;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use gloss_core::{Config, ImportFilter, ImportOptions, Importer, RunMode};

use crate::report;
use crate::OutputFormat;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file to import (overrides config)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Show the REST calls without sending them
    #[arg(long, conflicts_with = "execute")]
    pub dry_run: bool,

    /// Send the calls to Atlas even if the config enables dry-run
    #[arg(long)]
    pub execute: bool,

    /// Validate the CSV without creating anything
    #[arg(long)]
    pub validate_only: bool,

    /// Atlas base URL (overrides config)
    #[arg(long)]
    pub atlas_url: Option<String>,

    /// Atlas username (overrides config)
    #[arg(long)]
    pub atlas_username: Option<String>,

    /// Atlas password (overrides config)
    #[arg(long)]
    pub atlas_password: Option<String>,

    /// Verify TLS certificates (overrides config)
    #[arg(long)]
    pub verify_ssl: Option<bool>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log level (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file (overrides config)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Only import this glossary (repeatable)
    #[arg(long)]
    pub filter_glossary: Vec<String>,

    /// Only import this term (repeatable)
    #[arg(long)]
    pub filter_term: Vec<String>,

    /// Skip relationship creation
    #[arg(long)]
    pub exclude_relationships: bool,
}

impl ImportArgs {
    /// Apply command-line overrides on top of file and environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(csv) = &self.csv {
            config.import.csv_file = Some(csv.display().to_string());
        }
        if self.dry_run {
            config.import.dry_run = true;
        }
        if self.execute {
            config.import.dry_run = false;
        }
        if let Some(level) = &self.log_level {
            config.import.log_level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.import.log_file = Some(file.clone());
        }
        if let Some(url) = &self.atlas_url {
            config.atlas.base_url = url.clone();
        }
        if let Some(user) = &self.atlas_username {
            config.atlas.username = user.clone();
        }
        if let Some(password) = &self.atlas_password {
            config.atlas.password = password.clone();
        }
        if let Some(verify) = self.verify_ssl {
            config.atlas.verify_ssl = verify;
        }
        if let Some(timeout) = self.timeout {
            config.atlas.timeout = timeout;
        }
    }

    fn options(&self, config: &Config) -> ImportOptions {
        ImportOptions {
            csv_path: self.csv.clone(),
            mode: RunMode::from_flags(config.import.dry_run, self.validate_only),
            filter: ImportFilter {
                glossaries: self.filter_glossary.clone(),
                terms: self.filter_term.clone(),
            },
            exclude_relationships: self.exclude_relationships,
        }
    }
}

/// Run an import and print its summary.
pub async fn execute(args: ImportArgs, config: Config, format: OutputFormat) -> Result<()> {
    let options = args.options(&config);
    let base_url = config.atlas.base_url.clone();
    let importer = Importer::new(config);

    let spinner = (options.mode == RunMode::Execute && format == OutputFormat::Text).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Importing into {base_url}..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = importer.run(&options).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let summary = result?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => report::print_import(&summary, &base_url),
    }

    Ok(())
}
