//! Term relationship kinds and the edge lists attached to terms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The eight kinds of relationship a term can have to another term.
///
/// Declaration order is the order edges are reported and sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Synonym,
    Antonym,
    RelatedTerm,
    PreferredTerm,
    ReplacementTerm,
    SeeAlso,
    IsA,
    Classifies,
}

impl RelationshipType {
    /// Every kind, in declaration order.
    pub const ALL: [RelationshipType; 8] = [
        Self::Synonym,
        Self::Antonym,
        Self::RelatedTerm,
        Self::PreferredTerm,
        Self::ReplacementTerm,
        Self::SeeAlso,
        Self::IsA,
        Self::Classifies,
    ];

    /// Name used in the CSV `relationship_type` column and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synonym => "synonym",
            Self::Antonym => "antonym",
            Self::RelatedTerm => "related_term",
            Self::PreferredTerm => "preferred_term",
            Self::ReplacementTerm => "replacement_term",
            Self::SeeAlso => "see_also",
            Self::IsA => "is_a",
            Self::Classifies => "classifies",
        }
    }

    /// Field of the Atlas term payload that carries this kind.
    pub fn wire_field(&self) -> &'static str {
        match self {
            Self::Synonym => "synonyms",
            Self::Antonym => "antonyms",
            Self::RelatedTerm => "relatedTerms",
            Self::PreferredTerm => "preferredTerms",
            Self::ReplacementTerm => "replacementTerms",
            Self::SeeAlso => "seeAlso",
            Self::IsA => "isA",
            Self::Classifies => "classifies",
        }
    }

    /// Human-readable label for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Synonym => "Synonyms",
            Self::Antonym => "Antonyms",
            Self::RelatedTerm => "Related Terms",
            Self::PreferredTerm => "Preferred Terms",
            Self::ReplacementTerm => "Replacement Terms",
            Self::SeeAlso => "See Also",
            Self::IsA => "Is A",
            Self::Classifies => "Classifies",
        }
    }

    /// Directionality used when no configuration says otherwise.
    pub fn is_bidirectional_by_default(&self) -> bool {
        matches!(
            self,
            Self::Synonym | Self::Antonym | Self::RelatedTerm | Self::SeeAlso
        )
    }

    /// Comma-separated list of valid names, for error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no relationship kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown relationship type: {0}")]
pub struct UnknownRelationshipType(pub String);

impl FromStr for RelationshipType {
    type Err = UnknownRelationshipType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownRelationshipType(s.to_string()))
    }
}

/// A relationship declared by one CSV row (or synthesized as the reverse of one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source_glossary: String,
    pub source_name: String,
    pub target_glossary: String,
    pub target_name: String,
    pub relationship_type: RelationshipType,
    pub is_bidirectional: bool,
}

impl Relationship {
    /// The same relationship seen from the target's side.
    pub fn reversed(&self) -> Self {
        Self {
            source_glossary: self.target_glossary.clone(),
            source_name: self.target_name.clone(),
            target_glossary: self.source_glossary.clone(),
            target_name: self.source_name.clone(),
            relationship_type: self.relationship_type,
            is_bidirectional: self.is_bidirectional,
        }
    }
}

/// Outgoing edges of a term, grouped by kind.
///
/// Each list holds qualified names of target terms in insertion order,
/// without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TermRelations(BTreeMap<RelationshipType, Vec<String>>);

impl TermRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns false if it was already present.
    pub fn insert(&mut self, kind: RelationshipType, target: impl Into<String>) -> bool {
        let target = target.into();
        let targets = self.0.entry(kind).or_default();
        if targets.contains(&target) {
            return false;
        }
        targets.push(target);
        true
    }

    /// Targets of one kind.
    pub fn get(&self, kind: RelationshipType) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty edge lists in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (RelationshipType, &[String])> {
        self.0
            .iter()
            .filter(|(_, targets)| !targets.is_empty())
            .map(|(kind, targets)| (*kind, targets.as_slice()))
    }

    /// Every target reference regardless of kind.
    pub fn targets(&self) -> impl Iterator<Item = &String> {
        self.0.values().flatten()
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Synonym".parse::<RelationshipType>(), Ok(RelationshipType::Synonym));
        assert_eq!(" IS_A ".parse::<RelationshipType>(), Ok(RelationshipType::IsA));
        assert!("parent".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_default_directionality() {
        let bidirectional: Vec<_> = RelationshipType::ALL
            .iter()
            .filter(|t| t.is_bidirectional_by_default())
            .map(|t| t.as_str())
            .collect();
        assert_eq!(bidirectional, vec!["synonym", "antonym", "related_term", "see_also"]);
    }

    #[test]
    fn test_relations_suppress_duplicates() {
        let mut relations = TermRelations::new();
        assert!(relations.insert(RelationshipType::Synonym, "Finance.Income@glossary"));
        assert!(!relations.insert(RelationshipType::Synonym, "Finance.Income@glossary"));
        assert!(relations.insert(RelationshipType::SeeAlso, "Finance.Income@glossary"));
        assert_eq!(relations.len(), 2);
        assert_eq!(relations.get(RelationshipType::Synonym), ["Finance.Income@glossary"]);
        assert!(relations.get(RelationshipType::IsA).is_empty());
    }

    #[test]
    fn test_relations_keep_insertion_order() {
        let mut relations = TermRelations::new();
        relations.insert(RelationshipType::Antonym, "G.Zeta@glossary");
        relations.insert(RelationshipType::Antonym, "G.Alpha@glossary");
        assert_eq!(
            relations.get(RelationshipType::Antonym),
            ["G.Zeta@glossary", "G.Alpha@glossary"]
        );
    }
}
