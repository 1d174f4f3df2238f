#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use gloss_core::catalog::{
    BatchCreateResult, Catalog, CatalogError, CategoryPayload, CreateResult, DeleteResult,
    EntityHeader, GlossaryHeader, GlossaryPayload, TermPayload, TermRelationsPayload,
};

/// One glossary, two terms and a synonym between them.
pub const FINANCE_CSV: &str = "\
type,glossary_name,name,category_names,short_description,\
relationship_type,linked_glossary_name,linked_entity_name
glossary,Finance,,,,,,
term,Finance,Revenue,,Income from sales,,,
term,Finance,Income,,,,,
relationship,Finance,Revenue,,,synonym,Finance,Income
";

/// Nested categories, category links and every relationship direction.
pub const CATALOG_CSV: &str = "\
type,glossary_name,name,parent_category_name,category_names,short_description,\
status,steward,abbreviation,examples,relationship_type,linked_glossary_name,linked_entity_name
glossary,Finance
category,Finance,Ledgers,Accounting,,Ledger accounts
category,Finance,Accounting,,,Accounting practice
term,Finance,Revenue,,\"Accounting, Ledgers\",Income from sales,,cfo@example.com,REV,\
\"Q1 sales, Q2 sales\"
term,Finance,Income,,Accounting
term,Finance,Turnover,,,,Draft
glossary,Sales
term,Sales,Deal,,,Closed opportunity
relationship,Finance,Revenue,,,,,,,,synonym,Finance,Income
relationship,Finance,Turnover,,,,,,,,preferred_term,Finance,Revenue
relationship,Sales,Deal,,,,,,,,related_term,Finance,Revenue
";

pub fn write_csv(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("glossary.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: usize,
    /// Glossary name to GUID.
    pub glossaries: BTreeMap<String, String>,
    /// (glossary, category) to GUID.
    pub categories: BTreeMap<(String, String), String>,
    /// Category GUID to parent category GUID.
    pub category_parents: BTreeMap<String, Option<String>>,
    /// (glossary, term) to GUID.
    pub terms: BTreeMap<(String, String), String>,
    /// Term GUID to the category GUIDs it was filed under.
    pub term_categories: BTreeMap<String, Vec<String>>,
    /// Glossaries that exist but cannot be found by name.
    pub hidden_glossaries: BTreeSet<String>,
    /// Categories that exist but cannot be found by name.
    pub hidden_categories: BTreeSet<(String, String)>,
    /// Terms that exist but cannot be found by name.
    pub hidden_terms: BTreeSet<(String, String)>,
    /// Recorded calls that answer with a server error.
    pub failing: BTreeSet<String>,
    /// Glossary GUIDs whose deletion fails.
    pub undeletable: BTreeSet<String>,
    pub relation_updates: Vec<(String, TermRelationsPayload)>,
    pub calls: Vec<String>,
    pub offline: bool,
}

impl FakeState {
    fn issue(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn fail_if_requested(&self, call: &str, operation: &str) -> Result<(), CatalogError> {
        if self.failing.contains(call) {
            return Err(CatalogError::Api {
                operation: operation.into(),
                status: 500,
                message: "internal server error".into(),
            });
        }
        Ok(())
    }

    fn glossary_name(&self, guid: &str) -> Option<String> {
        self.glossaries
            .iter()
            .find(|(_, g)| g.as_str() == guid)
            .map(|(name, _)| name.clone())
    }
}

/// In-memory catalog with Atlas conflict semantics.
///
/// Creating an entity that exists answers with a conflict; a term batch
/// conflicts as a whole if any of its terms exists, and then creates nothing.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    state: Mutex<FakeState>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_glossary(self, name: &str) -> Self {
        {
            let mut state = self.state();
            let guid = state.issue("glossary");
            state.glossaries.insert(name.to_string(), guid);
        }
        self
    }

    /// Add a category to an existing glossary, creating the glossary if needed.
    pub fn with_category(self, glossary: &str, name: &str) -> Self {
        {
            let mut state = self.state();
            if !state.glossaries.contains_key(glossary) {
                let guid = state.issue("glossary");
                state.glossaries.insert(glossary.to_string(), guid);
            }
            let guid = state.issue("category");
            state.category_parents.insert(guid.clone(), None);
            state
                .categories
                .insert((glossary.to_string(), name.to_string()), guid);
        }
        self
    }

    pub fn with_term(self, glossary: &str, name: &str) -> Self {
        {
            let mut state = self.state();
            let guid = state.issue("term");
            state.terms.insert((glossary.to_string(), name.to_string()), guid);
        }
        self
    }

    pub fn hide_glossary(self, name: &str) -> Self {
        self.state().hidden_glossaries.insert(name.to_string());
        self
    }

    pub fn hide_category(self, glossary: &str, name: &str) -> Self {
        self.state()
            .hidden_categories
            .insert((glossary.to_string(), name.to_string()));
        self
    }

    /// Make the call recorded as `call` fail with a 500.
    pub fn fail_on(self, call: &str) -> Self {
        self.state().failing.insert(call.to_string());
        self
    }

    pub fn hide_term(self, glossary: &str, name: &str) -> Self {
        self.state()
            .hidden_terms
            .insert((glossary.to_string(), name.to_string()));
        self
    }

    pub fn offline(self) -> Self {
        self.state().offline = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn glossary_guid(&self, name: &str) -> Option<String> {
        self.state().glossaries.get(name).cloned()
    }

    pub fn category_guid(&self, glossary: &str, name: &str) -> Option<String> {
        self.state()
            .categories
            .get(&(glossary.to_string(), name.to_string()))
            .cloned()
    }

    pub fn term_guid(&self, glossary: &str, name: &str) -> Option<String> {
        self.state()
            .terms
            .get(&(glossary.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn test_connection(&self) -> Result<bool, CatalogError> {
        Ok(!self.state().offline)
    }

    async fn create_glossary(
        &self,
        payload: &GlossaryPayload,
    ) -> Result<CreateResult, CatalogError> {
        let mut state = self.state();
        let call = format!("create_glossary:{}", payload.name);
        state.calls.push(call.clone());
        state.fail_if_requested(&call, "create glossary")?;
        if state.glossaries.contains_key(&payload.name) {
            return Ok(CreateResult::Conflict);
        }
        let guid = state.issue("glossary");
        state.glossaries.insert(payload.name.clone(), guid.clone());
        Ok(CreateResult::Created(guid))
    }

    async fn find_glossary_by_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        let mut state = self.state();
        state.calls.push(format!("find_glossary:{name}"));
        if state.hidden_glossaries.contains(name) {
            return Ok(None);
        }
        Ok(state.glossaries.get(name).cloned())
    }

    async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CreateResult, CatalogError> {
        let mut state = self.state();
        let glossary = state
            .glossary_name(&payload.anchor.glossary_guid)
            .ok_or_else(|| CatalogError::Api {
                operation: "create category".into(),
                status: 400,
                message: "unknown glossary".into(),
            })?;
        let call = format!("create_category:{}.{}", glossary, payload.name);
        state.calls.push(call.clone());
        state.fail_if_requested(&call, "create category")?;

        let key = (glossary, payload.name.clone());
        if state.categories.contains_key(&key) {
            return Ok(CreateResult::Conflict);
        }
        if let Some(parent) = &payload.parent_category {
            if !state.categories.values().any(|g| *g == parent.category_guid) {
                return Err(CatalogError::Api {
                    operation: "create category".into(),
                    status: 400,
                    message: "parent category does not exist".into(),
                });
            }
        }
        let guid = state.issue("category");
        state.categories.insert(key, guid.clone());
        state.category_parents.insert(
            guid.clone(),
            payload.parent_category.as_ref().map(|p| p.category_guid.clone()),
        );
        Ok(CreateResult::Created(guid))
    }

    async fn find_category_by_name(
        &self,
        glossary_name: &str,
        category_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        let mut state = self.state();
        state.calls.push(format!("find_category:{glossary_name}.{category_name}"));
        let key = (glossary_name.to_string(), category_name.to_string());
        if state.hidden_categories.contains(&key) {
            return Ok(None);
        }
        Ok(state.categories.get(&key).cloned())
    }

    async fn create_terms(
        &self,
        payloads: &[TermPayload],
    ) -> Result<BatchCreateResult, CatalogError> {
        let mut state = self.state();
        let glossary = payloads
            .first()
            .and_then(|p| state.glossary_name(&p.anchor.glossary_guid))
            .unwrap_or_default();
        let call = format!("create_terms:{}:{}", glossary, payloads.len());
        state.calls.push(call.clone());
        state.fail_if_requested(&call, "create terms")?;

        let keys: Vec<(String, String)> = payloads
            .iter()
            .map(|p| {
                let g = state.glossary_name(&p.anchor.glossary_guid).unwrap_or_default();
                (g, p.name.clone())
            })
            .collect();
        if keys.iter().any(|k| state.terms.contains_key(k)) {
            return Ok(BatchCreateResult::Conflict);
        }

        let mut guids = Vec::new();
        for (key, payload) in keys.into_iter().zip(payloads) {
            let guid = state.issue("term");
            state.terms.insert(key, guid.clone());
            state.term_categories.insert(
                guid.clone(),
                payload.categories.iter().map(|c| c.category_guid.clone()).collect(),
            );
            guids.push(Some(guid));
        }
        Ok(BatchCreateResult::Created(guids))
    }

    async fn find_term_by_name(
        &self,
        glossary_name: &str,
        term_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        let mut state = self.state();
        state.calls.push(format!("find_term:{glossary_name}.{term_name}"));
        let key = (glossary_name.to_string(), term_name.to_string());
        if state.hidden_terms.contains(&key) {
            return Ok(None);
        }
        Ok(state.terms.get(&key).cloned())
    }

    async fn update_term_relationships(
        &self,
        term_guid: &str,
        relations: &TermRelationsPayload,
    ) -> Result<(), CatalogError> {
        let mut state = self.state();
        state.calls.push(format!("update_relationships:{term_guid}"));
        state.relation_updates.push((term_guid.to_string(), relations.clone()));
        Ok(())
    }

    async fn list_glossaries(&self) -> Result<Vec<GlossaryHeader>, CatalogError> {
        let state = self.state();
        Ok(state
            .glossaries
            .iter()
            .map(|(name, guid)| GlossaryHeader {
                guid: Some(guid.clone()),
                name: name.clone(),
                short_description: None,
            })
            .collect())
    }

    async fn list_categories(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<EntityHeader>, CatalogError> {
        let state = self.state();
        let glossary = state.glossary_name(glossary_guid).unwrap_or_default();
        Ok(state
            .categories
            .iter()
            .filter(|((g, _), _)| *g == glossary)
            .map(|((_, name), guid)| EntityHeader {
                guid: Some(guid.clone()),
                name: name.clone(),
            })
            .collect())
    }

    async fn list_terms(&self, glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError> {
        let state = self.state();
        let Some(glossary) = state.glossary_name(glossary_guid) else {
            return Err(CatalogError::Api {
                operation: "list terms".into(),
                status: 404,
                message: "glossary not found".into(),
            });
        };
        Ok(state
            .terms
            .iter()
            .filter(|((g, _), _)| *g == glossary)
            .map(|((_, name), guid)| EntityHeader {
                guid: Some(guid.clone()),
                name: name.clone(),
            })
            .collect())
    }

    async fn delete_glossary(&self, guid: &str) -> Result<DeleteResult, CatalogError> {
        let mut state = self.state();
        state.calls.push(format!("delete_glossary:{guid}"));
        if state.undeletable.contains(guid) {
            return Err(CatalogError::Api {
                operation: "delete glossary".into(),
                status: 500,
                message: "glossary is locked".into(),
            });
        }
        match state.glossary_name(guid) {
            Some(name) => {
                state.glossaries.remove(&name);
                Ok(DeleteResult::Deleted)
            }
            None => Ok(DeleteResult::NotFound),
        }
    }
}
