use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that abort a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{kind} '{key}' exists but could not retrieve GUID")]
    Unresolvable { kind: &'static str, key: String },

    #[error("No GUID for glossary '{0}'")]
    MissingGlossaryGuid(String),

    #[error("Parent category not found: {glossary}.{parent} (parent of {category})")]
    MissingParentCategory {
        glossary: String,
        category: String,
        parent: String,
    },

    #[error("Category parent cycle in glossary '{glossary}': {}", cycle.join(" -> "))]
    CyclicCategoryParentage { glossary: String, cycle: Vec<String> },

    #[error("Term GUID not found for: {target} (relationship of {term})")]
    UnresolvedRelationshipTarget { term: String, target: String },
}
