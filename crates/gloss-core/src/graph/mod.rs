//! Relationship graph builder.
//!
//! Attaches parsed relationships to their source terms as qualified-name
//! references and checks that every reference points at a known term.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{EntityKey, QualifiedName, Relationship, TermMap};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Source term not found: {glossary}.{name}")]
    MissingSource { glossary: String, name: String },
}

/// Builds the per-term edge lists for one run.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    terms: TermMap,
}

impl GraphBuilder {
    pub fn new(terms: TermMap) -> Self {
        Self { terms }
    }

    /// Attach relationships to their source terms.
    ///
    /// Returns the number of edges that were not already present. Stops at the
    /// first relationship whose source term is unknown.
    pub fn apply(&mut self, relationships: &[Relationship]) -> Result<usize, GraphError> {
        let mut added = 0;

        for rel in relationships {
            let key = EntityKey::new(&rel.source_glossary, &rel.source_name);
            let Some(term) = self.terms.get_mut(&key) else {
                return Err(GraphError::MissingSource {
                    glossary: rel.source_glossary.clone(),
                    name: rel.source_name.clone(),
                });
            };

            let target = QualifiedName::term(&rel.target_glossary, &rel.target_name).to_string();
            if term.relations.insert(rel.relationship_type, target.as_str()) {
                debug!(
                    source = %key,
                    kind = %rel.relationship_type,
                    target = %target,
                    "Attached edge"
                );
                added += 1;
            }
        }

        Ok(added)
    }

    /// Check every edge of every term.
    ///
    /// Never fails; problems are returned as warning lines, one per offending
    /// source term and reference.
    pub fn validate_all(&self) -> BTreeSet<String> {
        let mut warnings = BTreeSet::new();

        for (key, term) in &self.terms {
            for target in term.relations.targets() {
                match QualifiedName::parse(target) {
                    Ok(qn) => {
                        if !self.terms.contains_key(&qn.key()) {
                            let message =
                                format!("Relationship target not found: {key} -> {target}");
                            warnings.insert(message);
                        }
                    }
                    Err(e) => {
                        warnings.insert(e.to_string());
                    }
                }
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        warnings
    }

    pub fn terms(&self) -> &TermMap {
        &self.terms
    }

    pub fn into_terms(self) -> TermMap {
        self.terms
    }
}

/// Attach relationships to a term map in one step.
pub fn apply(terms: TermMap, relationships: &[Relationship]) -> Result<TermMap, GraphError> {
    let mut builder = GraphBuilder::new(terms);
    builder.apply(relationships)?;
    Ok(builder.into_terms())
}
