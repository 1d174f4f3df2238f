//! Deletion of glossaries from a catalog.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError, DeleteResult, GlossaryHeader};

/// What happened to one glossary selected for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Deleted,
    /// The catalog no longer had it.
    NotFound,
    Failed(String),
    /// The listing did not carry a GUID, so no delete was sent.
    MissingGuid,
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted | DeletionOutcome::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub glossary: GlossaryHeader,
    pub outcome: DeletionOutcome,
}

/// Glossaries to delete: all of them, or only those named.
pub async fn select_glossaries<C: Catalog + ?Sized>(
    catalog: &C,
    names: &[String],
) -> Result<Vec<GlossaryHeader>, CatalogError> {
    let mut glossaries = catalog.list_glossaries().await?;
    if !names.is_empty() {
        let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        glossaries.retain(|g| wanted.contains(g.name.as_str()));
    }
    Ok(glossaries)
}

/// Delete each glossary in turn. A failure is recorded and the rest continue.
pub async fn delete_glossaries<C: Catalog + ?Sized>(
    catalog: &C,
    targets: &[GlossaryHeader],
) -> Vec<Deletion> {
    let mut results = Vec::with_capacity(targets.len());

    for glossary in targets {
        let outcome = match glossary.guid.as_deref() {
            None => {
                warn!(glossary = %glossary.name, "Cannot delete glossary: no GUID found");
                DeletionOutcome::MissingGuid
            }
            Some(guid) => match catalog.delete_glossary(guid).await {
                Ok(DeleteResult::Deleted) => {
                    info!(glossary = %glossary.name, guid, "Deleted glossary");
                    DeletionOutcome::Deleted
                }
                Ok(DeleteResult::NotFound) => {
                    info!(glossary = %glossary.name, guid, "Glossary not found, already deleted?");
                    DeletionOutcome::NotFound
                }
                Err(e) => {
                    warn!(glossary = %glossary.name, "Failed to delete glossary: {}", e);
                    DeletionOutcome::Failed(e.to_string())
                }
            },
        };

        results.push(Deletion {
            glossary: glossary.clone(),
            outcome,
        });
    }

    results
}
