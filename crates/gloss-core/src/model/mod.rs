//! Data model for business glossary entities.
//!
//! Entities are identified by natural keys (glossary name, or glossary name
//! plus entity name) until the catalog assigns them a GUID.

mod entity;
mod qualified_name;
mod relationship;

pub use entity::{Category, Glossary, Term};
pub use qualified_name::{QualifiedName, QualifiedNameError, GLOSSARY_REALM};
pub use relationship::{Relationship, RelationshipType, TermRelations, UnknownRelationshipType};

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Natural key of a category or term: owning glossary plus own name.
///
/// Serialized as `glossary.name` so it can key JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub glossary: String,
    pub name: String,
}

impl EntityKey {
    pub fn new(glossary: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            glossary: glossary.into(),
            name: name.into(),
        }
    }
}

impl Serialize for EntityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.glossary, self.name)
    }
}

pub type GlossaryMap = BTreeMap<String, Glossary>;
pub type CategoryMap = BTreeMap<EntityKey, Category>;
pub type TermMap = BTreeMap<EntityKey, Term>;

/// Everything read from one glossary CSV file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlossarySet {
    pub glossaries: GlossaryMap,
    pub categories: CategoryMap,
    pub terms: TermMap,
    /// Declared relationships, with reverse edges of bidirectional kinds already added.
    #[serde(skip)]
    pub relationships: Vec<Relationship>,
    /// Rows skipped because their `type` was not recognised.
    pub skipped_rows: usize,
}

impl GlossarySet {
    /// Total number of relationship edges attached to terms.
    pub fn edge_count(&self) -> usize {
        self.terms.values().map(|t| t.relations.len()).sum()
    }

    /// Number of terms that have at least one edge.
    pub fn terms_with_edges(&self) -> usize {
        self.terms.values().filter(|t| !t.relations.is_empty()).count()
    }

    /// Copy GUIDs resolved by a publish run onto the entity records.
    pub fn assign_guids(&mut self, guids: &GuidMaps) {
        for (name, glossary) in &mut self.glossaries {
            glossary.guid = guids.glossaries.get(name).cloned();
        }
        for (key, category) in &mut self.categories {
            category.guid = guids.categories.get(key).cloned();
        }
        for (key, term) in &mut self.terms {
            term.guid = guids.terms.get(key).cloned();
        }
    }
}

/// GUIDs assigned by the catalog, one map per entity kind.
///
/// Each key is written once, by the pass that creates or resolves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuidMaps {
    pub glossaries: BTreeMap<String, String>,
    pub categories: BTreeMap<EntityKey, String>,
    pub terms: BTreeMap<EntityKey, String>,
}
