//! Cleanup command: delete glossaries from Atlas.

use clap::Args;
use color_eyre::eyre::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};

use gloss_core::catalog::GlossaryHeader;
use gloss_core::cleanup::{delete_glossaries, select_glossaries};
use gloss_core::{AtlasClient, Catalog, Config};

use crate::report;
use crate::OutputFormat;

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Only delete this glossary (repeatable). Deletes all glossaries when omitted.
    #[arg(long)]
    pub glossary_name: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: CleanupArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let client = AtlasClient::from_config(&config.atlas)?;
    if !client.test_connection().await? {
        bail!("Failed to connect to Atlas at {}", config.atlas.base_url);
    }

    let targets = select_glossaries(&client, &args.glossary_name).await?;
    if targets.is_empty() {
        if format == OutputFormat::Json {
            println!("[]");
        } else if args.glossary_name.is_empty() {
            println!("No glossaries found");
        } else {
            println!("No matching glossaries found");
        }
        return Ok(());
    }

    if format == OutputFormat::Text {
        report::print_cleanup_targets(&targets);
    }

    let prompt = "Are you sure you want to delete these glossaries? This cannot be undone.";
    if !args.force && !confirm(prompt)? {
        println!("Cancelled");
        return Ok(());
    }

    let pb = progress_bar(&targets, format);
    let mut deletions = Vec::with_capacity(targets.len());
    for target in &targets {
        pb.set_message(target.name.clone());
        deletions.extend(delete_glossaries(&client, std::slice::from_ref(target)).await);
        pb.inc(1);
    }
    pb.finish_and_clear();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deletions)?),
        OutputFormat::Text => report::print_deletions(&deletions),
    }

    let failed = deletions
        .iter()
        .filter(|d| !d.outcome.is_success())
        .count();
    if failed > 0 {
        bail!("{} of {} glossaries could not be deleted", failed, deletions.len());
    }

    Ok(())
}

fn progress_bar(targets: &[GlossaryHeader], format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

fn confirm(question: &str) -> Result<bool> {
    print!("\n{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
