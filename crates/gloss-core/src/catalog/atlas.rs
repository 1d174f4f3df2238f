use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    BatchCreateResult, Catalog, CatalogError, CategoryPayload, CreateResult, DeleteResult,
    EntityHeader, GlossaryHeader, GlossaryPayload, TermPayload, TermRelationsPayload,
};
use crate::config::{AtlasConfig, ATLAS_API_PREFIX, DEFAULT_SEARCH_LIMIT};

/// Apache Atlas v2 REST client for glossary operations.
///
/// Every request carries HTTP basic auth and is bounded by one timeout. There
/// are no retries; a failed call surfaces as [`CatalogError`].
pub struct AtlasClient {
    base_url: String,
    username: String,
    password: String,
    client: Client,
}

impl AtlasClient {
    /// Creates a client for the Atlas server at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        verify_ssl: bool,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Initialized Atlas client");

        Ok(Self {
            base_url,
            username: username.into(),
            password: password.into(),
            client,
        })
    }

    /// Creates a client from the `atlas` configuration section.
    pub fn from_config(config: &AtlasConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.base_url,
            &config.username,
            &config.password,
            config.verify_ssl,
            Duration::from_secs(config.timeout),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, ATLAS_API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
            .header("content-type", "application/json")
    }

    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, CatalogError> {
        request
            .send()
            .await
            .map_err(|e| CatalogError::network(operation, e))
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
        operation: &str,
    ) -> Result<Response, CatalogError> {
        if let Ok(text) = serde_json::to_string(body) {
            debug!("{} {} {}", method, self.url(path), text);
        }
        self.send(operation, self.request(method, path).json(body)).await
    }

    /// GET returning the parsed body, or `None` for any non-200 answer.
    async fn get_if_ok(&self, path: &str, operation: &str) -> Result<Option<Value>, CatalogError> {
        let response = self.send(operation, self.request(Method::GET, path)).await?;
        if response.status() != StatusCode::OK {
            debug!(status = response.status().as_u16(), path, "Lookup returned no result");
            return Ok(None);
        }
        read_body(response, operation).await
    }

    /// GET that must succeed; non-success is an API error.
    async fn get_required(&self, path: &str, operation: &str) -> Result<Value, CatalogError> {
        let response = self.send(operation, self.request(Method::GET, path)).await?;
        Ok(check(response, operation).await?.unwrap_or(Value::Null))
    }

    /// POST a create request, mapping 409 to a conflict.
    async fn create<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        operation: &str,
    ) -> Result<Option<Value>, CatalogError> {
        let response = self.send_json(Method::POST, path, body, operation).await?;
        if response.status() == StatusCode::CONFLICT {
            debug!(operation, "Entity already exists");
            return Ok(None);
        }
        Ok(Some(check(response, operation).await?.unwrap_or(Value::Null)))
    }

    /// Scan a list endpoint for an entity with the given name.
    async fn find_in_list(
        &self,
        path: &str,
        name: &str,
        operation: &str,
    ) -> Result<Option<String>, CatalogError> {
        let Some(body) = self.get_if_ok(path, operation).await? else {
            return Ok(None);
        };
        Ok(entity_list(&body)
            .iter()
            .find(|entity| entity_name(entity) == Some(name))
            .and_then(entity_guid))
    }

    async fn list_headers(
        &self,
        path: &str,
        operation: &str,
    ) -> Result<Vec<EntityHeader>, CatalogError> {
        let body = self.get_required(path, operation).await?;
        Ok(entity_list(&body)
            .iter()
            .map(|entity| EntityHeader {
                guid: entity_guid(entity),
                name: entity_name(entity).unwrap_or("Unknown").to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl Catalog for AtlasClient {
    async fn test_connection(&self) -> Result<bool, CatalogError> {
        match self.send("test connection", self.request(Method::GET, "/types/typedefs")).await {
            Ok(response) if response.status() == StatusCode::OK => {
                info!("Successfully connected to Atlas server");
                Ok(true)
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Failed to connect to Atlas");
                Ok(false)
            }
            Err(e) => {
                warn!("Failed to connect to Atlas: {}", e);
                Ok(false)
            }
        }
    }

    async fn create_glossary(
        &self,
        payload: &GlossaryPayload,
    ) -> Result<CreateResult, CatalogError> {
        let operation = format!("create glossary '{}'", payload.name);
        match self.create("/glossary", payload, &operation).await? {
            None => Ok(CreateResult::Conflict),
            Some(body) => created_guid(&body, &operation).map(CreateResult::Created),
        }
    }

    async fn find_glossary_by_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        self.find_in_list("/glossary", name, &format!("find glossary '{name}'"))
            .await
    }

    async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CreateResult, CatalogError> {
        let operation = format!("create category '{}'", payload.name);
        match self.create("/glossary/category", payload, &operation).await? {
            None => Ok(CreateResult::Conflict),
            Some(body) => created_guid(&body, &operation).map(CreateResult::Created),
        }
    }

    async fn find_category_by_name(
        &self,
        glossary_name: &str,
        category_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        let Some(glossary_guid) = self.find_glossary_by_name(glossary_name).await? else {
            return Ok(None);
        };
        let operation = format!("find category '{glossary_name}.{category_name}'");
        self.find_in_list(
            &format!("/glossary/{glossary_guid}/categories"),
            category_name,
            &operation,
        )
        .await
    }

    async fn create_terms(
        &self,
        payloads: &[TermPayload],
    ) -> Result<BatchCreateResult, CatalogError> {
        let operation = format!("create {} terms", payloads.len());
        let Some(body) = self.create("/glossary/terms", payloads, &operation).await? else {
            return Ok(BatchCreateResult::Conflict);
        };

        let mut guids: Vec<Option<String>> = entity_list(&body).iter().map(entity_guid).collect();
        guids.resize(payloads.len(), None);
        Ok(BatchCreateResult::Created(guids))
    }

    async fn find_term_by_name(
        &self,
        glossary_name: &str,
        term_name: &str,
    ) -> Result<Option<String>, CatalogError> {
        let operation = format!("find term '{glossary_name}.{term_name}'");

        if let Some(glossary_guid) = self.find_glossary_by_name(glossary_name).await? {
            let found = self
                .find_in_list(&format!("/glossary/{glossary_guid}/terms"), term_name, &operation)
                .await?;
            if found.is_some() {
                return Ok(found);
            }
        }

        // Fallback over every term, matched on the owning glossary's name.
        let Some(body) = self.get_if_ok("/glossary/terms", &operation).await? else {
            return Ok(None);
        };
        Ok(entity_list(&body)
            .iter()
            .find(|term| {
                let anchor = term.pointer("/anchor/glossaryName").and_then(Value::as_str);
                entity_name(term) == Some(term_name) && anchor == Some(glossary_name)
            })
            .and_then(entity_guid))
    }

    async fn update_term_relationships(
        &self,
        term_guid: &str,
        relations: &TermRelationsPayload,
    ) -> Result<(), CatalogError> {
        let operation = format!("update relationships for term {term_guid}");
        let response = self
            .send_json(Method::PATCH, &format!("/glossary/term/{term_guid}"), relations, &operation)
            .await?;
        check(response, &operation).await?;
        Ok(())
    }

    async fn list_glossaries(&self) -> Result<Vec<GlossaryHeader>, CatalogError> {
        let operation = "list glossaries";
        let search = json!({
            "typeName": "AtlasGlossary",
            "limit": DEFAULT_SEARCH_LIMIT,
        });

        let response = self
            .send_json(Method::POST, "/search/basic", &search, operation)
            .await?;
        let body = if response.status() == StatusCode::OK {
            read_body(response, operation).await?.unwrap_or(Value::Null)
        } else {
            warn!(
                status = response.status().as_u16(),
                "Glossary search failed, falling back to glossary listing"
            );
            self.get_required("/glossary", operation).await?
        };

        Ok(entity_list(&body)
            .iter()
            .map(|entity| GlossaryHeader {
                guid: entity_guid(entity),
                name: entity_name(entity).unwrap_or("Unknown").to_string(),
                short_description: entity_attribute(entity, "shortDescription").map(str::to_string),
            })
            .collect())
    }

    async fn list_categories(
        &self,
        glossary_guid: &str,
    ) -> Result<Vec<EntityHeader>, CatalogError> {
        self.list_headers(
            &format!("/glossary/{glossary_guid}/categories"),
            &format!("list categories of glossary {glossary_guid}"),
        )
        .await
    }

    async fn list_terms(&self, glossary_guid: &str) -> Result<Vec<EntityHeader>, CatalogError> {
        self.list_headers(
            &format!("/glossary/{glossary_guid}/terms"),
            &format!("list terms of glossary {glossary_guid}"),
        )
        .await
    }

    async fn delete_glossary(&self, guid: &str) -> Result<DeleteResult, CatalogError> {
        let operation = format!("delete glossary {guid}");
        let response = self
            .send(&operation, self.request(Method::DELETE, &format!("/glossary/{guid}")))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DeleteResult::NotFound);
        }
        check(response, &operation).await?;
        Ok(DeleteResult::Deleted)
    }
}

/// Turn an error status into [`CatalogError::Api`]; otherwise read the body.
async fn check(response: Response, operation: &str) -> Result<Option<Value>, CatalogError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let text = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: error_message(&text),
        });
    }
    read_body(response, operation).await
}

async fn read_body(response: Response, operation: &str) -> Result<Option<Value>, CatalogError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let text = response
        .text()
        .await
        .map_err(|e| CatalogError::network(operation, e))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| CatalogError::parse(operation, e))
}

/// `errorMessage` from a JSON error body, else the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("errorMessage").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn created_guid(body: &Value, operation: &str) -> Result<String, CatalogError> {
    entity_guid(body).ok_or_else(|| CatalogError::MissingGuid(operation.to_string()))
}

/// Entities from a list response, whatever envelope the server used.
fn entity_list(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items.clone(),
        Value::Object(map) => ["categories", "terms", "entities", "value", "results"]
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn entity_attribute<'a>(entity: &'a Value, field: &str) -> Option<&'a str> {
    entity
        .get(field)
        .or_else(|| entity.get("attributes").and_then(|a| a.get(field)))
        .and_then(Value::as_str)
}

fn entity_name(entity: &Value) -> Option<&str> {
    entity_attribute(entity, "name")
        .or_else(|| entity_attribute(entity, "displayText"))
        .or_else(|| entity_attribute(entity, "displayName"))
}

fn entity_guid(entity: &Value) -> Option<String> {
    ["guid", "categoryGuid", "termGuid", "id"]
        .iter()
        .find_map(|field| entity.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_list_shapes() {
        let item = json!({"guid": "c-1", "name": "Accounting"});
        for body in [
            json!([item.clone()]),
            json!({"categories": [item.clone()]}),
            json!({"entities": [item.clone()]}),
            json!({"value": [item.clone()]}),
            json!({"results": [item.clone()]}),
        ] {
            let list = entity_list(&body);
            assert_eq!(list.len(), 1, "shape {body}");
            assert_eq!(entity_name(&list[0]), Some("Accounting"));
            assert_eq!(entity_guid(&list[0]).as_deref(), Some("c-1"));
        }
        assert!(entity_list(&json!({"other": []})).is_empty());
    }

    #[test]
    fn test_related_header_fields() {
        let header = json!({"categoryGuid": "c-9", "displayText": "Ledgers"});
        assert_eq!(entity_name(&header), Some("Ledgers"));
        assert_eq!(entity_guid(&header).as_deref(), Some("c-9"));
    }

    #[test]
    fn test_search_result_attributes() {
        let entity = json!({
            "guid": "g-1",
            "attributes": {"name": "Finance", "shortDescription": "Money"}
        });
        assert_eq!(entity_name(&entity), Some("Finance"));
        assert_eq!(entity_attribute(&entity, "shortDescription"), Some("Money"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"errorMessage": "bad anchor"}"#), "bad anchor");
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_url_building() {
        let timeout = Duration::from_secs(5);
        let client = AtlasClient::new("http://atlas:21000/", "u", "p", true, timeout).unwrap();
        assert_eq!(client.url("/glossary"), "http://atlas:21000/api/atlas/v2/glossary");
    }
}
