//! Import orchestration.
//!
//! An import parses the CSV file, applies filters, builds and validates the
//! relationship graph, and then, depending on [`RunMode`], stops there,
//! publishes to a [`DryRunCatalog`], or publishes to the configured Atlas
//! server.
//!
//! # Example
//!
//! ```ignore
//! use gloss_core::{Config, ImportOptions, Importer, RunMode};
//!
//! let importer = Importer::new(Config::load()?);
//! let options = ImportOptions::new("glossary.csv").with_mode(RunMode::DryRun);
//! let summary = importer.run(&options).await?;
//! println!("{} planned calls", summary.planned_calls.len());
//! ```

mod filter;

pub use filter::ImportFilter;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{AtlasClient, Catalog, CatalogError, DryRunCatalog, PlannedCall};
use crate::config::{Config, ConfigError};
use crate::graph::{GraphBuilder, GraphError};
use crate::model::GlossarySet;
use crate::parser::{CsvParser, ParseError};
use crate::publish::{PublishError, PublishReport, Publisher};

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No CSV file specified. Use --csv or set import.csv_file in config")]
    MissingCsv,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Failed to connect to Atlas at {0}")]
    ConnectionFailed(String),
}

/// What an import does after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Publish to the configured catalog.
    Execute,
    /// Publish to a recording catalog; nothing leaves the process.
    DryRun,
    /// Stop after parsing and validation.
    ValidateOnly,
}

impl RunMode {
    /// Validation-only wins over dry-run.
    pub fn from_flags(dry_run: bool, validate_only: bool) -> Self {
        if validate_only {
            RunMode::ValidateOnly
        } else if dry_run {
            RunMode::DryRun
        } else {
            RunMode::Execute
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Overrides `import.csv_file` from configuration.
    pub csv_path: Option<PathBuf>,
    pub mode: RunMode,
    pub filter: ImportFilter,
    pub exclude_relationships: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            csv_path: None,
            mode: RunMode::DryRun,
            filter: ImportFilter::default(),
            exclude_relationships: false,
        }
    }
}

impl ImportOptions {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: Some(csv_path.into()),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_filter(mut self, filter: ImportFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn without_relationships(mut self) -> Self {
        self.exclude_relationships = true;
        self
    }
}

/// A parsed, filtered and validated import, ready to publish.
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub set: GlossarySet,
    pub warnings: BTreeSet<String>,
    pub include_relationships: bool,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub glossaries: usize,
    pub categories: usize,
    pub terms: usize,
    /// Edges attached to terms, reverse edges included.
    pub relationships: usize,
    pub terms_with_relationships: usize,
}

impl EntityCounts {
    pub fn of(set: &GlossarySet) -> Self {
        Self {
            glossaries: set.glossaries.len(),
            categories: set.categories.len(),
            terms: set.terms.len(),
            relationships: set.edge_count(),
            terms_with_relationships: set.terms_with_edges(),
        }
    }
}

/// Everything an import run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub counts: EntityCounts,
    /// Validation warnings, sorted.
    pub warnings: Vec<String>,
    pub skipped_rows: usize,
    pub set: GlossarySet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PublishReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planned_calls: Vec<PlannedCall>,
}

impl ImportSummary {
    fn new(mode: RunMode, prepared: PreparedImport) -> Self {
        Self {
            mode,
            started_at: prepared.started_at,
            finished_at: Utc::now(),
            counts: EntityCounts::of(&prepared.set),
            warnings: prepared.warnings.into_iter().collect(),
            skipped_rows: prepared.set.skipped_rows,
            set: prepared.set,
            report: None,
            planned_calls: Vec::new(),
        }
    }
}

/// Runs glossary imports with one configuration.
pub struct Importer {
    config: Config,
}

impl Importer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse, filter and validate without talking to any catalog.
    pub fn prepare(&self, options: &ImportOptions) -> Result<PreparedImport, ImportError> {
        let started_at = Utc::now();
        self.config.validate()?;

        let csv_path = options
            .csv_path
            .clone()
            .or_else(|| self.config.import.csv_file.as_ref().map(PathBuf::from))
            .ok_or(ImportError::MissingCsv)?;

        let parser = CsvParser::from_config(&self.config.relationships);
        let mut set = options.filter.apply(parser.parse_path(&csv_path)?);

        if options.exclude_relationships {
            info!("Relationships excluded from this import");
            set.relationships.clear();
        }

        let mut graph = GraphBuilder::new(std::mem::take(&mut set.terms));
        let added = graph.apply(&set.relationships)?;
        let warnings = graph.validate_all();
        set.terms = graph.into_terms();

        info!(
            edges = added,
            warnings = warnings.len(),
            "Relationship graph built"
        );

        Ok(PreparedImport {
            set,
            warnings,
            include_relationships: !options.exclude_relationships,
            started_at,
        })
    }

    /// Run an import in the requested mode.
    pub async fn run(&self, options: &ImportOptions) -> Result<ImportSummary, ImportError> {
        let prepared = self.prepare(options)?;

        match options.mode {
            RunMode::ValidateOnly => Ok(self.validate(prepared)),
            RunMode::DryRun => self.dry_run(prepared).await,
            RunMode::Execute => {
                let client = AtlasClient::from_config(&self.config.atlas)?;
                self.execute(prepared, client).await
            }
        }
    }

    /// Summary of a prepared import with nothing published.
    pub fn validate(&self, prepared: PreparedImport) -> ImportSummary {
        info!("Validation complete, nothing published");
        ImportSummary::new(RunMode::ValidateOnly, prepared)
    }

    /// Publish to a [`DryRunCatalog`] and return the calls a real run would make.
    ///
    /// Relationship targets outside the set are planned with placeholder GUIDs.
    pub async fn dry_run(&self, prepared: PreparedImport) -> Result<ImportSummary, ImportError> {
        info!("DRY RUN MODE - no changes will be made to Atlas");

        let publisher = Publisher::new(DryRunCatalog::new()).with_placeholder_targets();
        let report = publisher
            .publish(&prepared.set, prepared.include_relationships)
            .await?;
        let planned_calls = publisher.into_catalog().into_calls();

        let mut summary = ImportSummary::new(RunMode::DryRun, prepared);
        summary.report = Some(report);
        summary.planned_calls = planned_calls;
        summary.finished_at = Utc::now();
        Ok(summary)
    }

    /// Publish to `catalog` and write the resulting GUIDs onto the entity set.
    pub async fn execute<C: Catalog>(
        &self,
        prepared: PreparedImport,
        catalog: C,
    ) -> Result<ImportSummary, ImportError> {
        info!(base_url = %self.config.atlas.base_url, "Testing connection to Atlas");
        if !catalog.test_connection().await? {
            return Err(ImportError::ConnectionFailed(self.config.atlas.base_url.clone()));
        }

        let publisher = Publisher::new(catalog);
        let report = publisher
            .publish(&prepared.set, prepared.include_relationships)
            .await?;

        if !report.warnings.is_empty() {
            warn!(count = report.warnings.len(), "Import finished with warnings");
        }
        info!(
            glossaries = report.glossaries.total(),
            categories = report.categories.total(),
            terms = report.terms.total(),
            relationship_updates = report.relationships.updated_terms,
            "Import completed"
        );

        let mut summary = ImportSummary::new(RunMode::Execute, prepared);
        summary.set.assign_guids(&report.guids);
        summary.report = Some(report);
        summary.finished_at = Utc::now();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_from_flags() {
        assert_eq!(RunMode::from_flags(true, true), RunMode::ValidateOnly);
        assert_eq!(RunMode::from_flags(false, true), RunMode::ValidateOnly);
        assert_eq!(RunMode::from_flags(true, false), RunMode::DryRun);
        assert_eq!(RunMode::from_flags(false, false), RunMode::Execute);
    }

    #[test]
    fn test_missing_csv() {
        let importer = Importer::new(Config::default());
        let err = importer.prepare(&ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingCsv));
    }
}
