//! Crebain API client

use async_trait::async_trait;

use crate::error::Result;

pub mod crebain;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod trace;
pub mod transport;

pub use crebain::CrebainClient;
#[cfg(test)]
pub use mock::MockCrebainClient;
pub use models::{
    EntitiesPage, Entity, EntitySubmitResult, FileItem, FilesFromUrlsRequest, FilesFromUrlsResult,
    PersonSubmitResult, RequestFilter, RequestInfo, RequestsPage, SubmitEntityRequest,
    SubmitPersonRequest, WebhookSubscription,
};
pub use trace::TracedTransport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Crebain API client trait
#[async_trait]
pub trait CrebainApi: Send + Sync {
    /// Submit (or re-submit) an entity for enrichment
    async fn submit_entity(&self, request: &SubmitEntityRequest) -> Result<EntitySubmitResult>;

    /// List entities, `limit` per page (max 200)
    async fn list_entities(&self, limit: u32, cursor: Option<&str>) -> Result<EntitiesPage>;

    /// Submit a person for an adverse news check
    async fn submit_person(&self, request: &SubmitPersonRequest) -> Result<PersonSubmitResult>;

    /// Get an async request by ID
    async fn get_request(&self, request_id: &str) -> Result<RequestInfo>;

    /// List async requests with optional filters
    async fn list_requests(&self, filter: &RequestFilter) -> Result<RequestsPage>;

    /// Get stored files for source URLs, triggering ingestion of missing ones
    async fn files_from_urls(&self, request: &FilesFromUrlsRequest) -> Result<FilesFromUrlsResult>;

    /// Register a webhook endpoint signed with `secret`
    async fn create_webhook(&self, url: &str, secret: &str) -> Result<WebhookSubscription>;

    /// List registered webhooks
    async fn list_webhooks(&self) -> Result<Vec<WebhookSubscription>>;

    /// Delete a webhook subscription
    async fn delete_webhook(&self, webhook_id: &str) -> Result<()>;
}
