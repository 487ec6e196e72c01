//! Request and response models for the Crebain API
//!
//! Response models are permissive: every field the service may omit is
//! optional, and the few attributes that appear under more than one name
//! (`file_id`/`id`, `signed_url`/`download_url`, ...) are kept separately and
//! resolved through accessor methods.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Files
// ============================================================================

/// A stored file, as returned alongside entity and request results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,

    /// URL the file was originally ingested from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Time-limited, pre-authenticated download link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Async request that produced the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl FileItem {
    /// File identifier, preferring `file_id` over `id`
    pub fn id(&self) -> Option<&str> {
        self.file_id.as_deref().or(self.id.as_deref())
    }

    /// Display name, preferring `filename` over `name`
    pub fn display_name(&self) -> Option<&str> {
        self.filename.as_deref().or(self.name.as_deref())
    }

    /// Download link, preferring `signed_url` over `download_url`
    pub fn url(&self) -> Option<&str> {
        self.signed_url
            .as_deref()
            .or(self.download_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Entity resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Caller-chosen identifier the entity was submitted with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_entity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity {
    /// Entity identifier, preferring `entity_id` over `id`
    pub fn id(&self) -> Option<&str> {
        self.entity_id.as_deref().or(self.id.as_deref())
    }
}

/// One page of entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitiesPage {
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Cursor for the next page; `None` on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

impl EntitiesPage {
    pub fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Entity submission payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmitEntityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_entity_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Re-run enrichment even when results exist
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub adverse_news_only: bool,

    /// Restrict enrichment to these fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Sent as the `Idempotency-Key` header, not in the body
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl SubmitEntityRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn external_entity_id(mut self, id: impl Into<String>) -> Self {
        self.external_entity_id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn company_description(mut self, description: impl Into<String>) -> Self {
        self.company_description = Some(description.into());
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn adverse_news_only(mut self, adverse_news_only: bool) -> Self {
        self.adverse_news_only = adverse_news_only;
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Result of an entity submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySubmitResult {
    pub entity_id: String,

    /// Whether the entity was created by this submission
    #[serde(default)]
    pub new_company: bool,

    /// Whether an async enrichment request was started
    #[serde(default)]
    pub request_submitted: bool,

    #[serde(default)]
    pub async_request_id: Option<String>,

    /// Files already available for the entity
    #[serde(default)]
    pub existing_files: Vec<FileItem>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

// ============================================================================
// Persons
// ============================================================================

/// Person adverse-news submission payload
#[derive(Debug, Clone, Serialize)]
pub struct SubmitPersonRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl SubmitPersonRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company_name: None,
            entity_id: None,
            idempotency_key: None,
        }
    }

    pub fn company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Result of a person submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonSubmitResult {
    pub person_name: String,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub entity_id: Option<String>,

    #[serde(default)]
    pub request_submitted: bool,

    #[serde(default)]
    pub async_request_id: Option<String>,

    #[serde(default)]
    pub existing_files: Vec<FileItem>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

// ============================================================================
// Async requests
// ============================================================================

pub const STATUS_COMPLETE: &str = "complete";
pub const STATUS_FAILED: &str = "failed";

/// Full details of an async request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestInfo {
    pub id: String,

    /// Request kind, e.g. `entity_enrich` or `url_ingest`
    pub kind: String,

    /// One of `submitted`, `processing`, `complete`, `failed`
    pub status: String,

    #[serde(default)]
    pub payload: Option<Value>,

    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub files: Vec<FileItem>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub completed_at: Option<String>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

impl RequestInfo {
    pub fn is_complete(&self) -> bool {
        self.status == STATUS_COMPLETE
    }

    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED
    }
}

/// Async request as it appears in listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: String,
    pub kind: String,
    pub status: String,

    #[serde(default)]
    pub payload: Option<Value>,

    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub completed_at: Option<String>,
}

/// One page of async requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestsPage {
    #[serde(default)]
    pub requests: Vec<RequestSummary>,

    #[serde(default)]
    pub next_cursor: Option<String>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

/// Filters for listing async requests
#[derive(Debug, Clone)]
pub struct RequestFilter {
    /// Page size (the API caps this at 200)
    pub limit: u32,
    pub cursor: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            cursor: None,
            status: None,
            kind: None,
        }
    }
}

impl RequestFilter {
    /// Query string pairs for this filter
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(ref status) = self.status {
            query.push(("status".to_string(), status.clone()));
        }
        if let Some(ref kind) = self.kind {
            query.push(("kind".to_string(), kind.clone()));
        }
        query
    }
}

// ============================================================================
// Files from URLs
// ============================================================================

/// Request files for a list of source URLs, ingesting the missing ones
#[derive(Debug, Clone, Serialize)]
pub struct FilesFromUrlsRequest {
    pub url_list: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,

    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl FilesFromUrlsRequest {
    pub fn new(url_list: Vec<String>) -> Self {
        Self {
            url_list,
            entity_id: None,
            force: false,
            idempotency_key: None,
        }
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesFromUrlsResult {
    /// Files already available
    #[serde(default)]
    pub files: Vec<FileItem>,

    /// Source URLs with no stored file yet
    #[serde(default)]
    pub missing: Vec<String>,

    #[serde(default)]
    pub request_submitted: bool,

    #[serde(default)]
    pub async_request_id: Option<String>,

    #[serde(skip)]
    pub request_id: Option<String>,
}

// ============================================================================
// Webhooks
// ============================================================================

/// Webhook subscription creation payload
#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookRequest {
    /// HTTPS endpoint that receives events
    pub url: String,

    /// Shared secret used to sign deliveries
    pub secret: String,
}

/// Registered webhook subscription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookSubscription {
    pub id: String,
    pub url: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}
