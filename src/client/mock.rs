//! Mock Crebain API client for testing
//!
//! Provides a mock implementation of [`CrebainApi`] for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::CrebainApi;
use super::models::{
    EntitiesPage, Entity, EntitySubmitResult, FilesFromUrlsRequest, FilesFromUrlsResult,
    PersonSubmitResult, RequestFilter, RequestInfo, RequestsPage, SubmitEntityRequest,
    SubmitPersonRequest, WebhookSubscription,
};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockCrebainClient::new()
///     .with_entities(vec![Entity { name: Some("Acme".into()), ..Default::default() }])
///     .await;
///
/// let page = mock.list_entities(20, None).await?;
/// assert_eq!(page.entities.len(), 1);
/// ```
#[derive(Default)]
pub struct MockCrebainClient {
    /// Result returned from submit_entity
    submit_result: Arc<Mutex<EntitySubmitResult>>,
    /// Entities returned from list_entities
    entities: Arc<Mutex<Vec<Entity>>>,
    /// Webhooks returned from list_webhooks and appended by create_webhook
    webhooks: Arc<Mutex<Vec<WebhookSubscription>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Names of the operations called, in order
    calls: Arc<Mutex<Vec<&'static str>>>,
    /// Submissions received, for test assertions
    submitted: Arc<Mutex<Vec<SubmitEntityRequest>>>,
}

impl MockCrebainClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the result of submit_entity.
    pub async fn with_submit_result(self, result: EntitySubmitResult) -> Self {
        *self.submit_result.lock().await = result;
        self
    }

    /// Configure entities to return from list_entities.
    pub async fn with_entities(self, entities: Vec<Entity>) -> Self {
        *self.entities.lock().await = entities;
        self
    }

    /// Configure webhooks to return from list_webhooks.
    pub async fn with_webhooks(self, webhooks: Vec<WebhookSubscription>) -> Self {
        *self.webhooks.lock().await = webhooks;
        self
    }

    /// Configure an error for the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Operations called so far, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    /// Entity submissions received so far.
    pub async fn submitted(&self) -> Vec<SubmitEntityRequest> {
        self.submitted.lock().await.clone()
    }

    /// Record the call and return the configured error, if any.
    async fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().await.push(operation);
        match self.error.lock().await.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CrebainApi for MockCrebainClient {
    async fn submit_entity(&self, request: &SubmitEntityRequest) -> Result<EntitySubmitResult> {
        self.record("submit_entity").await?;
        self.submitted.lock().await.push(request.clone());
        Ok(self.submit_result.lock().await.clone())
    }

    async fn list_entities(&self, limit: u32, _cursor: Option<&str>) -> Result<EntitiesPage> {
        self.record("list_entities").await?;
        let entities = self.entities.lock().await;
        Ok(EntitiesPage {
            entities: entities.iter().take(limit as usize).cloned().collect(),
            next_cursor: None,
            request_id: Some("req_mock".to_string()),
        })
    }

    async fn submit_person(&self, request: &SubmitPersonRequest) -> Result<PersonSubmitResult> {
        self.record("submit_person").await?;
        Ok(PersonSubmitResult {
            person_name: request.name.clone(),
            company_name: request.company_name.clone(),
            entity_id: request.entity_id.clone(),
            ..Default::default()
        })
    }

    async fn get_request(&self, request_id: &str) -> Result<RequestInfo> {
        self.record("get_request").await?;
        Err(ApiError::InvalidResponse(format!("No mock request {}", request_id)).into())
    }

    async fn list_requests(&self, _filter: &RequestFilter) -> Result<RequestsPage> {
        self.record("list_requests").await?;
        Ok(RequestsPage::default())
    }

    async fn files_from_urls(&self, request: &FilesFromUrlsRequest) -> Result<FilesFromUrlsResult> {
        self.record("files_from_urls").await?;
        Ok(FilesFromUrlsResult {
            missing: request.url_list.clone(),
            ..Default::default()
        })
    }

    async fn create_webhook(&self, url: &str, _secret: &str) -> Result<WebhookSubscription> {
        self.record("create_webhook").await?;
        let mut webhooks = self.webhooks.lock().await;
        let webhook = WebhookSubscription {
            id: format!("wh_{}", webhooks.len() + 1),
            url: url.to_string(),
            enabled: true,
            ..Default::default()
        };
        webhooks.push(webhook.clone());
        Ok(webhook)
    }

    async fn list_webhooks(&self) -> Result<Vec<WebhookSubscription>> {
        self.record("list_webhooks").await?;
        Ok(self.webhooks.lock().await.clone())
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.record("delete_webhook").await?;
        self.webhooks.lock().await.retain(|w| w.id != webhook_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_error_is_consumed_on_first_use() {
        let mock = MockCrebainClient::new()
            .with_error(ApiError::Network("down".to_string()))
            .await;

        assert!(mock.list_webhooks().await.is_err());
        assert!(mock.list_webhooks().await.is_ok());
        assert_eq!(mock.calls().await, vec!["list_webhooks", "list_webhooks"]);
    }

    #[tokio::test]
    async fn test_mock_webhook_lifecycle() {
        let mock = MockCrebainClient::new();
        let created = mock
            .create_webhook("https://hooks.example.com/webhook", "secret")
            .await
            .unwrap();
        assert_eq!(mock.list_webhooks().await.unwrap().len(), 1);

        mock.delete_webhook(&created.id).await.unwrap();
        assert!(mock.list_webhooks().await.unwrap().is_empty());
    }
}
