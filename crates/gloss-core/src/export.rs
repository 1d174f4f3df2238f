//! Export of the glossaries a catalog currently holds.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError, EntityHeader};

/// One glossary with the names of its categories and terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossaryExport {
    pub guid: Option<String>,
    pub name: String,
    pub short_description: Option<String>,
    pub categories: Vec<EntityHeader>,
    pub terms: Vec<EntityHeader>,
}

/// List every glossary with its categories and terms.
///
/// Failing to list the contents of one glossary is logged and leaves that
/// glossary's lists empty; failing to list glossaries at all is an error.
pub async fn export_glossaries<C: Catalog + ?Sized>(
    catalog: &C,
) -> Result<Vec<GlossaryExport>, CatalogError> {
    let glossaries = catalog.list_glossaries().await?;
    info!(count = glossaries.len(), "Exporting glossaries");

    let mut exports = Vec::with_capacity(glossaries.len());
    for glossary in glossaries {
        let (categories, terms) = match glossary.guid.as_deref() {
            Some(guid) => (
                catalog.list_categories(guid).await.unwrap_or_else(|e| {
                    warn!(glossary = %glossary.name, "Failed to list categories: {}", e);
                    Vec::new()
                }),
                catalog.list_terms(guid).await.unwrap_or_else(|e| {
                    warn!(glossary = %glossary.name, "Failed to list terms: {}", e);
                    Vec::new()
                }),
            ),
            None => {
                warn!(glossary = %glossary.name, "Glossary has no GUID, contents not listed");
                (Vec::new(), Vec::new())
            }
        };

        exports.push(GlossaryExport {
            guid: glossary.guid,
            name: glossary.name,
            short_description: glossary.short_description,
            categories,
            terms,
        });
    }

    Ok(exports)
}
