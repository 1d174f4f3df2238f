pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod export;
pub mod graph;
pub mod import;
pub mod model;
pub mod parser;
pub mod publish;

pub use catalog::{AtlasClient, Catalog, CatalogError, DryRunCatalog};
pub use config::{Config, ConfigError};
pub use graph::{GraphBuilder, GraphError};
pub use import::{ImportError, ImportFilter, ImportOptions, ImportSummary, Importer, RunMode};
pub use model::{EntityKey, GlossarySet, QualifiedName, RelationshipType};
pub use parser::{CsvParser, ParseError};
pub use publish::{PublishError, PublishReport, Publisher};
