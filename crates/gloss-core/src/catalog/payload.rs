//! Request bodies sent to the catalog and the headers it returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::RelationshipType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryAnchor {
    pub glossary_guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub category_guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRef {
    pub term_guid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub anchor: GlossaryAnchor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<CategoryRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermPayload {
    pub name: String,
    pub anchor: GlossaryAnchor,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steward: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryRef>,
}

/// Relationship update for one term: wire field name to target GUIDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TermRelationsPayload(BTreeMap<&'static str, Vec<TermRef>>);

impl TermRelationsPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: RelationshipType, term_guid: impl Into<String>) {
        self.0.entry(kind.wire_field()).or_default().push(TermRef {
            term_guid: term_guid.into(),
        });
    }

    pub fn get(&self, kind: RelationshipType) -> &[TermRef] {
        self.0.get(kind.wire_field()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of references across all kinds.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summary of a glossary as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossaryHeader {
    pub guid: Option<String>,
    pub name: String,
    pub short_description: Option<String>,
}

/// Summary of a category or term as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityHeader {
    pub guid: Option<String>,
    pub name: String,
}
