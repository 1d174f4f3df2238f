//! Glossary, category and term records.

use serde::Serialize;

use super::{EntityKey, QualifiedName, TermRelations};
use crate::config::DEFAULT_ENTITY_STATUS;

/// A business glossary, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Glossary {
    pub name: String,
    /// Assigned by the catalog once created or found.
    pub guid: Option<String>,
}

impl Glossary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: None,
        }
    }
}

/// A category inside a glossary, optionally nested under a parent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub glossary_name: String,
    pub name: String,
    /// Name of another category in the same glossary.
    pub parent_category_name: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub status: String,
    pub guid: Option<String>,
}

impl Category {
    pub fn new(glossary_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            glossary_name: glossary_name.into(),
            name: name.into(),
            parent_category_name: None,
            short_description: None,
            long_description: None,
            status: DEFAULT_ENTITY_STATUS.to_string(),
            guid: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_category_name = Some(parent.into());
        self
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.glossary_name, &self.name)
    }

    /// Key of the parent category, if one is declared.
    pub fn parent_key(&self) -> Option<EntityKey> {
        self.parent_category_name
            .as_ref()
            .map(|parent| EntityKey::new(&self.glossary_name, parent))
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::category(
            &self.glossary_name,
            self.parent_category_name.as_deref(),
            &self.name,
        )
    }
}

/// A glossary term with its attributes and outgoing relationship edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub glossary_name: String,
    pub name: String,
    /// Categories of the same glossary this term is filed under.
    pub category_names: Vec<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub status: String,
    pub steward: Option<String>,
    pub abbreviation: Option<String>,
    pub examples: Vec<String>,
    pub guid: Option<String>,
    pub relations: TermRelations,
}

impl Term {
    pub fn new(glossary_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            glossary_name: glossary_name.into(),
            name: name.into(),
            category_names: Vec::new(),
            short_description: None,
            long_description: None,
            status: DEFAULT_ENTITY_STATUS.to_string(),
            steward: None,
            abbreviation: None,
            examples: Vec::new(),
            guid: None,
            relations: TermRelations::new(),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.glossary_name, &self.name)
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::term(&self.glossary_name, &self.name)
    }
}
