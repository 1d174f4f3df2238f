use serde::Serialize;

use crate::model::GuidMaps;

/// How an entity got its GUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Created(String),
    /// The entity already existed and was found by name.
    Resolved(String),
}

impl Resolution {
    pub fn guid(&self) -> &str {
        match self {
            Resolution::Created(guid) | Resolution::Resolved(guid) => guid,
        }
    }

    pub fn into_guid(self) -> String {
        match self {
            Resolution::Created(guid) | Resolution::Resolved(guid) => guid,
        }
    }
}

/// Counters for one entity pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub created: usize,
    pub resolved: usize,
    pub skipped: usize,
}

impl PassStats {
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Created(_) => self.created += 1,
            Resolution::Resolved(_) => self.resolved += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.resolved
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipStats {
    /// Terms that received an update call.
    pub updated_terms: usize,
    /// Edges sent across all updates.
    pub edges: usize,
    /// Terms with edges but no GUID.
    pub skipped_terms: usize,
}

/// Result of a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub guids: GuidMaps,
    pub glossaries: PassStats,
    pub categories: PassStats,
    pub terms: PassStats,
    pub relationships: RelationshipStats,
    /// Non-fatal problems, in the order they happened.
    pub warnings: Vec<String>,
}
