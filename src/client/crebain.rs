//! Crebain API client implementation

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::models::{
    CreateWebhookRequest, EntitiesPage, EntitySubmitResult, FilesFromUrlsRequest,
    FilesFromUrlsResult, PersonSubmitResult, RequestFilter, RequestInfo, RequestsPage,
    SubmitEntityRequest, SubmitPersonRequest, WebhookSubscription,
};
use super::trace::TracedTransport;
use super::transport::{ApiRequest, HttpTransport, Transport};
use super::CrebainApi;
use crate::config::Config;
use crate::error::{ApiError, Result};

/// Crebain API client, generic over how requests are sent
pub struct CrebainClient<T: Transport = HttpTransport> {
    transport: T,
}

impl CrebainClient<HttpTransport> {
    /// Create a client from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(http_transport(config)?))
    }
}

impl CrebainClient<TracedTransport<HttpTransport>> {
    /// Create a client that logs every request it sends
    pub fn traced(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(TracedTransport::new(http_transport(
            config,
        )?)))
    }
}

fn http_transport(config: &Config) -> Result<HttpTransport> {
    HttpTransport::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.anon_key.clone(),
        config.timeout,
    )
}

impl<T: Transport> CrebainClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Send a request and decode its payload, returning the API request id alongside
    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<(R, Option<String>)> {
        let response = self.transport.send(&request).await?;
        let decoded = serde_json::from_value(response.data).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to decode {} {} response: {}",
                request.method, request.path, e
            ))
        })?;
        Ok((decoded, response.request_id))
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(body)?)
}

#[async_trait]
impl<T: Transport> CrebainApi for CrebainClient<T> {
    async fn submit_entity(&self, request: &SubmitEntityRequest) -> Result<EntitySubmitResult> {
        let api_request = ApiRequest::post("/v1/entity/submit", to_body(request)?)
            .with_idempotency_key(request.idempotency_key.clone());

        let (mut result, request_id): (EntitySubmitResult, _) = self.call(api_request).await?;
        result.request_id = request_id;
        Ok(result)
    }

    async fn list_entities(&self, limit: u32, cursor: Option<&str>) -> Result<EntitiesPage> {
        let mut query = vec![("limit".to_string(), limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor".to_string(), cursor.to_string()));
        }

        let (mut page, request_id): (EntitiesPage, _) = self
            .call(ApiRequest::get("/v1/entities").with_query(query))
            .await?;
        page.request_id = request_id;
        Ok(page)
    }

    async fn submit_person(&self, request: &SubmitPersonRequest) -> Result<PersonSubmitResult> {
        let api_request = ApiRequest::post("/v1/person/submit", to_body(request)?)
            .with_idempotency_key(request.idempotency_key.clone());

        let (mut result, request_id): (PersonSubmitResult, _) = self.call(api_request).await?;
        result.request_id = request_id;
        Ok(result)
    }

    async fn get_request(&self, request_id: &str) -> Result<RequestInfo> {
        let path = format!("/v1/requests/{}", request_id);
        let (mut info, api_request_id): (RequestInfo, _) =
            self.call(ApiRequest::get(path)).await?;
        info.request_id = api_request_id;
        Ok(info)
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<RequestsPage> {
        let (mut page, request_id): (RequestsPage, _) = self
            .call(ApiRequest::get("/v1/requests").with_query(filter.to_query()))
            .await?;
        page.request_id = request_id;
        Ok(page)
    }

    async fn files_from_urls(&self, request: &FilesFromUrlsRequest) -> Result<FilesFromUrlsResult> {
        let api_request = ApiRequest::post("/v1/files/from-urls", to_body(request)?)
            .with_idempotency_key(request.idempotency_key.clone());

        let (mut result, request_id): (FilesFromUrlsResult, _) = self.call(api_request).await?;
        result.request_id = request_id;
        Ok(result)
    }

    async fn create_webhook(&self, url: &str, secret: &str) -> Result<WebhookSubscription> {
        let body = to_body(&CreateWebhookRequest {
            url: url.to_string(),
            secret: secret.to_string(),
        })?;

        let (webhook, _) = self.call(ApiRequest::post("/v1/webhooks", body)).await?;
        Ok(webhook)
    }

    async fn list_webhooks(&self) -> Result<Vec<WebhookSubscription>> {
        #[derive(Deserialize)]
        struct WebhooksResponse {
            #[serde(default)]
            webhooks: Vec<WebhookSubscription>,
        }

        let (response, _): (WebhooksResponse, _) =
            self.call(ApiRequest::get("/v1/webhooks")).await?;
        Ok(response.webhooks)
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let path = format!("/v1/webhooks/{}", webhook_id);
        self.transport.send(&ApiRequest::delete(path)).await?;
        Ok(())
    }
}
