//! Dependency-ordered publisher.
//!
//! Creates entities in the order the catalog requires: glossaries, then
//! categories (parents before children), then terms in one batch per
//! glossary, and finally term relationships once every term has a GUID.
//!
//! The catalog answers "already exists" with a conflict instead of returning
//! the existing entity, so every create is followed by a name lookup when it
//! conflicts. Running the same input twice therefore converges on the same
//! GUIDs.

mod error;
mod report;

pub use error::PublishError;
pub use report::{PassStats, PublishReport, RelationshipStats, Resolution};

use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::catalog::{
    BatchCreateResult, Catalog, CategoryPayload, CategoryRef, CreateResult, GlossaryAnchor,
    GlossaryPayload, TermPayload, TermRelationsPayload,
};
use crate::model::{
    Category, CategoryMap, EntityKey, GlossaryMap, GlossarySet, QualifiedName, Term, TermMap,
};

/// Publishes a [`GlossarySet`] to a catalog.
pub struct Publisher<C: Catalog> {
    catalog: C,
    placeholder_targets: bool,
}

impl<C: Catalog> Publisher<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            placeholder_targets: false,
        }
    }

    /// Substitute a `<term_guid:...>` placeholder for relationship targets
    /// that have no GUID instead of failing. Used when planning a dry run.
    pub fn with_placeholder_targets(mut self) -> Self {
        self.placeholder_targets = true;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn into_catalog(self) -> C {
        self.catalog
    }

    /// Run all passes. Relationship updates are skipped when
    /// `include_relationships` is false.
    pub async fn publish(
        &self,
        set: &GlossarySet,
        include_relationships: bool,
    ) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        self.publish_glossaries(&set.glossaries, &mut report).await?;
        self.publish_categories(&set.categories, &mut report).await?;
        self.publish_terms(&set.terms, &mut report).await?;
        if include_relationships {
            self.publish_relationships(&set.terms, &mut report).await?;
        }

        Ok(report)
    }

    /// Pass 1: create or resolve every glossary.
    pub async fn publish_glossaries(
        &self,
        glossaries: &GlossaryMap,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        info!(count = glossaries.len(), "Publishing glossaries");

        for name in glossaries.keys() {
            let payload = GlossaryPayload { name: name.clone() };
            let resolution = match self.catalog.create_glossary(&payload).await? {
                CreateResult::Created(guid) => Resolution::Created(guid),
                CreateResult::Conflict => {
                    info!("Glossary '{}' already exists, fetching GUID", name);
                    let guid = self
                        .catalog
                        .find_glossary_by_name(name)
                        .await?
                        .ok_or_else(|| PublishError::Unresolvable {
                            kind: "Glossary",
                            key: name.clone(),
                        })?;
                    Resolution::Resolved(guid)
                }
            };

            log_resolution("glossary", name, &resolution);
            report.glossaries.record(&resolution);
            report.guids.glossaries.insert(name.clone(), resolution.into_guid());
        }

        Ok(())
    }

    /// Pass 2: create or resolve every category, parents first.
    pub async fn publish_categories(
        &self,
        categories: &CategoryMap,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        info!(count = categories.len(), "Publishing categories");

        for key in categories.keys() {
            if report.guids.categories.contains_key(key) {
                continue;
            }

            for pending in creation_order(categories, key, &report.guids.categories)? {
                let Some(category) = categories.get(&pending) else {
                    continue;
                };
                let resolution = self.publish_category(category, report).await?;
                log_resolution("category", &pending, &resolution);
                report.categories.record(&resolution);
                report.guids.categories.insert(pending, resolution.into_guid());
            }
        }

        Ok(())
    }

    async fn publish_category(
        &self,
        category: &Category,
        report: &PublishReport,
    ) -> Result<Resolution, PublishError> {
        let glossary_guid = report
            .guids
            .glossaries
            .get(&category.glossary_name)
            .ok_or_else(|| PublishError::MissingGlossaryGuid(category.glossary_name.clone()))?;

        let parent_category = match category.parent_key() {
            Some(parent) => {
                let guid = report.guids.categories.get(&parent).ok_or_else(|| {
                    PublishError::MissingParentCategory {
                        glossary: category.glossary_name.clone(),
                        category: category.name.clone(),
                        parent: parent.name.clone(),
                    }
                })?;
                Some(CategoryRef {
                    category_guid: guid.clone(),
                })
            }
            None => None,
        };

        let payload = CategoryPayload {
            name: category.name.clone(),
            anchor: GlossaryAnchor {
                glossary_guid: glossary_guid.clone(),
            },
            short_description: category.short_description.clone(),
            long_description: category.long_description.clone(),
            parent_category,
        };

        match self.catalog.create_category(&payload).await? {
            CreateResult::Created(guid) => Ok(Resolution::Created(guid)),
            CreateResult::Conflict => {
                info!(
                    "Category '{}.{}' already exists, fetching GUID",
                    category.glossary_name, category.name
                );
                self.catalog
                    .find_category_by_name(&category.glossary_name, &category.name)
                    .await?
                    .map(Resolution::Resolved)
                    .ok_or_else(|| PublishError::Unresolvable {
                        kind: "Category",
                        key: category.key().to_string(),
                    })
            }
        }
    }

    /// Pass 3: create terms in one batch per glossary.
    ///
    /// Category links that did not resolve in pass 2 are dropped with a
    /// warning. When the batch conflicts each term is looked up by name; terms
    /// that cannot be found are skipped.
    pub async fn publish_terms(
        &self,
        terms: &TermMap,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        info!(count = terms.len(), "Publishing terms");

        let mut by_glossary: BTreeMap<&str, Vec<&Term>> = BTreeMap::new();
        for term in terms.values() {
            by_glossary.entry(term.glossary_name.as_str()).or_default().push(term);
        }

        for (glossary, batch) in by_glossary {
            let glossary_guid = report
                .guids
                .glossaries
                .get(glossary)
                .cloned()
                .ok_or_else(|| PublishError::MissingGlossaryGuid(glossary.to_string()))?;

            let payloads: Vec<TermPayload> = batch
                .iter()
                .map(|term| term_payload(term, &glossary_guid, report))
                .collect();

            info!(glossary, count = payloads.len(), "Creating term batch");
            match self.catalog.create_terms(&payloads).await? {
                BatchCreateResult::Created(guids) => {
                    for (term, guid) in batch.iter().zip(guids) {
                        match guid {
                            Some(guid) => {
                                let resolution = Resolution::Created(guid);
                                log_resolution("term", &term.key(), &resolution);
                                report.terms.record(&resolution);
                                report.guids.terms.insert(term.key(), resolution.into_guid());
                            }
                            None => {
                                let message = format!("No GUID returned for term '{}'", term.key());
                                push_warning(report, message);
                                report.terms.skipped += 1;
                            }
                        }
                    }
                }
                BatchCreateResult::Conflict => {
                    info!(
                        "Some terms in glossary '{}' already exist, fetching GUIDs",
                        glossary
                    );
                    for term in batch {
                        match self.catalog.find_term_by_name(glossary, &term.name).await? {
                            Some(guid) => {
                                let resolution = Resolution::Resolved(guid);
                                log_resolution("term", &term.key(), &resolution);
                                report.terms.record(&resolution);
                                report.guids.terms.insert(term.key(), resolution.into_guid());
                            }
                            None => {
                                let message = format!(
                                    "Could not fetch GUID for existing term '{}'",
                                    term.key()
                                );
                                push_warning(report, message);
                                report.terms.skipped += 1;
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Pass 4: send each term's edges as GUID references in one update.
    ///
    /// A target without a GUID is fatal unless placeholder targets are
    /// enabled, in which case it is planned with a placeholder and a warning.
    pub async fn publish_relationships(
        &self,
        terms: &TermMap,
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        info!("Publishing term relationships");

        for (key, term) in terms {
            if term.relations.is_empty() {
                continue;
            }

            let Some(term_guid) = report.guids.terms.get(key).cloned() else {
                push_warning(
                    report,
                    format!("Term '{key}' not found in GUID map, skipping relationship update"),
                );
                report.relationships.skipped_terms += 1;
                continue;
            };

            let mut payload = TermRelationsPayload::new();
            for (kind, targets) in term.relations.iter() {
                for target in targets {
                    let qualified = QualifiedName::parse(target).ok();
                    let resolved = qualified
                        .as_ref()
                        .and_then(|qn| report.guids.terms.get(&qn.key()))
                        .cloned();
                    let guid = match resolved {
                        Some(guid) => guid,
                        None if self.placeholder_targets => {
                            push_warning(
                                report,
                                format!(
                                    "Term GUID not found for: {target} (relationship of {key}), \
                                     using placeholder"
                                ),
                            );
                            match qualified {
                                Some(qn) => format!("<term_guid:{}>", qn.key()),
                                None => format!("<term_guid:{target}>"),
                            }
                        }
                        None => {
                            return Err(PublishError::UnresolvedRelationshipTarget {
                                term: key.to_string(),
                                target: target.clone(),
                            })
                        }
                    };
                    payload.push(kind, guid);
                }
            }

            self.catalog.update_term_relationships(&term_guid, &payload).await?;
            info!(term = %key, edges = payload.len(), "Updated relationships");
            report.relationships.updated_terms += 1;
            report.relationships.edges += payload.len();
        }

        Ok(())
    }
}

fn term_payload(term: &Term, glossary_guid: &str, report: &mut PublishReport) -> TermPayload {
    let mut categories = Vec::new();
    for name in &term.category_names {
        match report.guids.categories.get(&EntityKey::new(&term.glossary_name, name)) {
            Some(guid) => categories.push(CategoryRef {
                category_guid: guid.clone(),
            }),
            None => push_warning(
                report,
                format!(
                    "Category '{}.{}' not found for term '{}', link dropped",
                    term.glossary_name,
                    name,
                    term.key()
                ),
            ),
        }
    }

    TermPayload {
        name: term.name.clone(),
        anchor: GlossaryAnchor {
            glossary_guid: glossary_guid.to_string(),
        },
        status: term.status.clone(),
        short_description: term.short_description.clone(),
        long_description: term.long_description.clone(),
        abbreviation: term.abbreviation.clone(),
        steward: term.steward.clone(),
        examples: term.examples.clone(),
        categories,
    }
}

/// Categories to create so that `start` can be created, root first.
///
/// Stops at the first ancestor that already has a GUID.
pub fn creation_order<G>(
    categories: &CategoryMap,
    start: &EntityKey,
    resolved: &BTreeMap<EntityKey, G>,
) -> Result<Vec<EntityKey>, PublishError> {
    let mut chain: Vec<EntityKey> = Vec::new();
    let mut visiting: BTreeSet<EntityKey> = BTreeSet::new();
    let mut current = start.clone();

    loop {
        if resolved.contains_key(&current) {
            break;
        }
        if !visiting.insert(current.clone()) {
            let from = chain.iter().position(|k| *k == current).unwrap_or(0);
            let mut cycle: Vec<String> = chain[from..].iter().map(|k| k.name.clone()).collect();
            cycle.push(current.name.clone());
            return Err(PublishError::CyclicCategoryParentage {
                glossary: current.glossary,
                cycle,
            });
        }

        let Some(category) = categories.get(&current) else {
            break;
        };
        chain.push(current.clone());

        match category.parent_key() {
            None => break,
            Some(parent)
                if !categories.contains_key(&parent) && !resolved.contains_key(&parent) =>
            {
                return Err(PublishError::MissingParentCategory {
                    glossary: category.glossary_name.clone(),
                    category: category.name.clone(),
                    parent: parent.name,
                });
            }
            Some(parent) => current = parent,
        }
    }

    chain.reverse();
    Ok(chain)
}

fn log_resolution(kind: &str, key: &impl std::fmt::Display, resolution: &Resolution) {
    match resolution {
        Resolution::Created(guid) => info!("Created {} '{}' with GUID: {}", kind, key, guid),
        Resolution::Resolved(guid) => {
            info!("Found existing {} '{}' with GUID: {}", kind, key, guid)
        }
    }
}

fn push_warning(report: &mut PublishReport, message: String) {
    warn!("{}", message);
    report.warnings.push(message);
}
