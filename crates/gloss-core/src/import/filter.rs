use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::model::GlossarySet;

/// Restricts an import to selected glossaries and/or terms.
///
/// Empty lists select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportFilter {
    pub glossaries: Vec<String>,
    pub terms: Vec<String>,
}

impl ImportFilter {
    pub fn is_empty(&self) -> bool {
        self.glossaries.is_empty() && self.terms.is_empty()
    }

    /// Drop everything the filter does not select.
    ///
    /// The glossary filter applies to glossaries, categories, terms and the
    /// source side of relationships. The term filter keeps terms by name and
    /// relationships whose source term is kept, so every remaining
    /// relationship still has its source.
    pub fn apply(&self, mut set: GlossarySet) -> GlossarySet {
        if !self.glossaries.is_empty() {
            let selected: BTreeSet<&str> = self.glossaries.iter().map(String::as_str).collect();
            set.glossaries.retain(|name, _| selected.contains(name.as_str()));
            set.categories.retain(|key, _| selected.contains(key.glossary.as_str()));
            set.terms.retain(|key, _| selected.contains(key.glossary.as_str()));
            set.relationships
                .retain(|rel| selected.contains(rel.source_glossary.as_str()));
            info!("Applied glossary filter: {}", self.glossaries.join(", "));
        }

        if !self.terms.is_empty() {
            let selected: BTreeSet<&str> = self.terms.iter().map(String::as_str).collect();
            set.terms.retain(|key, _| selected.contains(key.name.as_str()));
            let kept = &set.terms;
            set.relationships.retain(|rel| {
                kept.keys()
                    .any(|key| key.glossary == rel.source_glossary && key.name == rel.source_name)
            });
            info!("Applied term filter: {}", self.terms.join(", "));
        }

        set
    }
}
