use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{
    BatchCreateResult, Catalog, CatalogError, CategoryPayload, CreateResult, DeleteResult,
    EntityHeader, GlossaryHeader, GlossaryPayload, TermPayload, TermRelationsPayload,
};
use crate::config::ATLAS_API_PREFIX;

/// A request a real run would have sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCall {
    pub method: String,
    pub path: String,
    pub payload: Value,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<PlannedCall>,
    /// Placeholder glossary GUID to glossary name.
    glossaries: HashMap<String, String>,
}

/// Catalog that talks to nothing.
///
/// Every create succeeds with a readable placeholder GUID such as
/// `<term_guid:Finance.Revenue>`, lookups find nothing, and each call is kept
/// as a [`PlannedCall`] for review.
#[derive(Debug, Default)]
pub struct DryRunCatalog {
    state: Mutex<State>,
}

impl DryRunCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<PlannedCall> {
        self.lock().calls.clone()
    }

    pub fn into_calls(self) -> Vec<PlannedCall> {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record<T: Serialize + ?Sized>(&self, method: &str, path: &str, payload: &T) {
        let payload = serde_json::to_value(payload).unwrap_or(Value::Null);
        let path = format!("{ATLAS_API_PREFIX}{path}");
        debug!("[dry-run] {} {}", method, path);
        self.lock().calls.push(PlannedCall {
            method: method.to_string(),
            path,
            payload,
        });
    }

    fn glossary_name(&self, glossary_guid: &str) -> String {
        self.lock()
            .glossaries
            .get(glossary_guid)
            .cloned()
            .unwrap_or_else(|| glossary_guid.to_string())
    }
}

#[async_trait]
impl Catalog for DryRunCatalog {
    async fn test_connection(&self) -> Result<bool, CatalogError> {
        Ok(true)
    }

    async fn create_glossary(
        &self,
        payload: &GlossaryPayload,
    ) -> Result<CreateResult, CatalogError> {
        self.record("POST", "/glossary", payload);
        let guid = format!("<glossary_guid:{}>", payload.name);
        self.lock().glossaries.insert(guid.clone(), payload.name.clone());
        Ok(CreateResult::Created(guid))
    }

    async fn find_glossary_by_name(&self, _name: &str) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }

    async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CreateResult, CatalogError> {
        self.record("POST", "/glossary/category", payload);
        let glossary = self.glossary_name(&payload.anchor.glossary_guid);
        Ok(CreateResult::Created(format!("<category_guid:{}.{}>", glossary, payload.name)))
    }

    async fn find_category_by_name(
        &self,
        _glossary_name: &str,
        _category_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }

    async fn create_terms(
        &self,
        payloads: &[TermPayload],
    ) -> Result<BatchCreateResult, CatalogError> {
        self.record("POST", "/glossary/terms", payloads);
        let guids = payloads
            .iter()
            .map(|term| {
                let glossary = self.glossary_name(&term.anchor.glossary_guid);
                Some(format!("<term_guid:{}.{}>", glossary, term.name))
            })
            .collect();
        Ok(BatchCreateResult::Created(guids))
    }

    async fn find_term_by_name(
        &self,
        _glossary_name: &str,
        _term_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }

    async fn update_term_relationships(
        &self,
        term_guid: &str,
        relations: &TermRelationsPayload,
    ) -> Result<(), CatalogError> {
        self.record("PATCH", &format!("/glossary/term/{term_guid}"), relations);
        Ok(())
    }

    async fn list_glossaries(&self) -> Result<Vec<GlossaryHeader>, CatalogError> {
        Ok(Vec::new())
    }

    async fn list_categories(
        &self,
        _glossary_guid: &str,
    ) -> Result<Vec<EntityHeader>, CatalogError> {
        Ok(Vec::new())
    }

    async fn list_terms(&self, _glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError> {
        Ok(Vec::new())
    }

    async fn delete_glossary(&self, guid: &str) -> Result<DeleteResult, CatalogError> {
        self.record("DELETE", &format!("/glossary/{guid}"), &Value::Null);
        Ok(DeleteResult::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GlossaryAnchor;

    #[tokio::test]
    async fn test_placeholder_guids_name_the_entity() {
        let catalog = DryRunCatalog::new();
        let CreateResult::Created(glossary_guid) = catalog
            .create_glossary(&GlossaryPayload { name: "Finance".into() })
            .await
            .unwrap()
        else {
            panic!("dry run never conflicts");
        };
        assert_eq!(glossary_guid, "<glossary_guid:Finance>");

        let category = CategoryPayload {
            name: "Accounting".into(),
            anchor: GlossaryAnchor { glossary_guid },
            short_description: None,
            long_description: None,
            parent_category: None,
        };
        assert_eq!(
            catalog.create_category(&category).await.unwrap(),
            CreateResult::Created("<category_guid:Finance.Accounting>".into())
        );

        let calls = catalog.into_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "/api/atlas/v2/glossary");
        assert_eq!(calls[1].payload["anchor"]["glossaryGuid"], "<glossary_guid:Finance>");
    }
}
