//! Export command.

use color_eyre::eyre::Result;

use gloss_core::export::export_glossaries;
use gloss_core::{AtlasClient, Config};

use crate::report;
use crate::OutputFormat;

pub async fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    let client = AtlasClient::from_config(&config.atlas)?;
    let exports = export_glossaries(&client).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&exports)?),
        OutputFormat::Text => report::print_exports(&exports),
    }

    Ok(())
}
