mod atlas;
mod dry_run;
mod error;
mod payload;

pub use atlas::AtlasClient;
pub use dry_run::{DryRunCatalog, PlannedCall};
pub use error::CatalogError;
pub use payload::{
    CategoryPayload, CategoryRef, EntityHeader, GlossaryAnchor, GlossaryHeader, GlossaryPayload,
    TermPayload, TermRef, TermRelationsPayload,
};

use async_trait::async_trait;

/// Outcome of creating a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateResult {
    Created(String),
    /// The catalog already holds an entity with this name.
    Conflict,
}

/// Outcome of creating a batch of terms.
///
/// A conflict on any item rejects the whole batch; nothing is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCreateResult {
    /// One entry per submitted term, in submission order.
    Created(Vec<Option<String>>),
    Conflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResult {
    Deleted,
    NotFound,
}

/// Remote metadata catalog holding glossaries, categories and terms.
///
/// Creates report an existing entity as [`CreateResult::Conflict`] rather than
/// failing; callers resolve the GUID with the matching `find_*` lookup.
/// Lookups return `None` when the entity is not there.
///
/// # Implementations
///
/// - [`AtlasClient`]: Apache Atlas v2 REST API over HTTP
/// - [`DryRunCatalog`]: records calls without network access
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns true if the catalog is reachable and accepts our credentials.
    async fn test_connection(&self) -> Result<bool, CatalogError>;

    async fn create_glossary(
        &self,
        payload: &GlossaryPayload,
    ) -> Result<CreateResult, CatalogError>;

    async fn find_glossary_by_name(&self, name: &str) -> Result<Option<String>, CatalogError>;

    async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CreateResult, CatalogError>;

    async fn find_category_by_name(
        &self,
        glossary_name: &str,
        category_name: &str,
    ) -> Result<Option<String>, CatalogError>;

    async fn create_terms(
        &self,
        payloads: &[TermPayload],
    ) -> Result<BatchCreateResult, CatalogError>;

    async fn find_term_by_name(
        &self,
        glossary_name: &str,
        term_name: &str,
    ) -> Result<Option<String>, CatalogError>;

    async fn update_term_relationships(
        &self,
        term_guid: &str,
        relations: &TermRelationsPayload,
    ) -> Result<(), CatalogError>;

    async fn list_glossaries(&self) -> Result<Vec<GlossaryHeader>, CatalogError>;

    async fn list_categories(&self, glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError>;

    async fn list_terms(&self, glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError>;

    async fn delete_glossary(&self, guid: &str) -> Result<DeleteResult, CatalogError>;
}

#[async_trait]
impl Catalog for Box<dyn Catalog> {
    async fn test_connection(&self) -> Result<bool, CatalogError> {
        (**self).test_connection().await
    }

    async fn create_glossary(
        &self,
        payload: &GlossaryPayload,
    ) -> Result<CreateResult, CatalogError> {
        (**self).create_glossary(payload).await
    }

    async fn find_glossary_by_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        (**self).find_glossary_by_name(name).await
    }

    async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CreateResult, CatalogError> {
        (**self).create_category(payload).await
    }

    async fn find_category_by_name(
        &self,
        glossary_name: &str,
        category_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        (**self).find_category_by_name(glossary_name, category_name).await
    }

    async fn create_terms(
        &self,
        payloads: &[TermPayload],
    ) -> Result<BatchCreateResult, CatalogError> {
        (**self).create_terms(payloads).await
    }

    async fn find_term_by_name(
        &self,
        glossary_name: &str,
        term_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        (**self).find_term_by_name(glossary_name, term_name).await
    }

    async fn update_term_relationships(
        &self,
        term_guid: &str,
        relations: &TermRelationsPayload,
    ) -> Result<(), CatalogError> {
        (**self).update_term_relationships(term_guid, relations).await
    }

    async fn list_glossaries(&self) -> Result<Vec<GlossaryHeader>, CatalogError> {
        (**self).list_glossaries().await
    }

    async fn list_categories(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<EntityHeader>, CatalogError> {
        (**self).list_categories(glossary_guid).await
    }

    async fn list_terms(&self, glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError> {
        (**self).list_terms(glossary_guid).await
    }

    async fn delete_glossary(&self, guid: &str) -> Result<DeleteResult, CatalogError> {
        (**self).delete_glossary(guid).await
    }
}
