//! Qualified names: the textual references used before GUIDs are known.
//!
//! Format: `<glossary>.[<parent>.]<name>@glossary`. The first dot segment is
//! the owning glossary, the last one is the entity's own name. Anything in
//! between is carried along but never interpreted.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::EntityKey;

/// Realm suffix every qualified name ends with.
pub const GLOSSARY_REALM: &str = "glossary";

/// Why a qualified name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualifiedNameError {
    #[error("Invalid qualified name: {0}")]
    InvalidRealm(String),

    #[error("Invalid qualified name format: {0}")]
    TooFewSegments(String),
}

/// A parsed qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub glossary: String,
    pub parents: Vec<String>,
    pub name: String,
}

impl QualifiedName {
    /// Qualified name of a term.
    pub fn term(glossary: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            glossary: glossary.into(),
            parents: Vec::new(),
            name: name.into(),
        }
    }

    /// Qualified name of a category, with its parent segment when it has one.
    pub fn category(
        glossary: impl Into<String>,
        parent: Option<&str>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            glossary: glossary.into(),
            parents: parent.map(|p| vec![p.to_string()]).unwrap_or_default(),
            name: name.into(),
        }
    }

    /// Parse `glossary.[parent.]name@glossary`.
    pub fn parse(s: &str) -> Result<Self, QualifiedNameError> {
        let mut parts = s.split('@');
        let qualified = parts.next().unwrap_or_default();
        let realm = parts.next();
        if realm != Some(GLOSSARY_REALM) || parts.next().is_some() {
            return Err(QualifiedNameError::InvalidRealm(s.to_string()));
        }

        let segments: Vec<&str> = qualified.split('.').collect();
        if segments.len() < 2 {
            return Err(QualifiedNameError::TooFewSegments(s.to_string()));
        }

        Ok(Self {
            glossary: segments[0].to_string(),
            parents: segments[1..segments.len() - 1]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            name: segments[segments.len() - 1].to_string(),
        })
    }

    /// Natural key of the referenced entity.
    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.glossary, &self.name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glossary)?;
        for parent in &self.parents {
            write!(f, ".{parent}")?;
        }
        write!(f, ".{}@{GLOSSARY_REALM}", self.name)
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
