//! The client integration walkthrough
//!
//! Four fixed steps, run in order against any [`CrebainApi`]:
//!
//! 1. Submit (onboard) an entity, idempotently
//! 2. Show the files the service already holds for it
//! 3. Download those files from their signed URLs
//! 4. List entities as a sanity check
//!
//! The first error aborts the run. Remote API errors are logged with
//! everything needed to raise a support ticket before being returned.

use serde_json::{Map, Value, json};

use crate::client::{CrebainApi, EntitySubmitResult, FileItem, SubmitEntityRequest};
use crate::config::Config;
use crate::download::{DownloadReport, download_signed_files};
use crate::error::{Error, RemoteError, Result};
use crate::output::formatters::{RULE, or_placeholder, preview};

/// Page size used for the entity listing step
pub const ENTITY_LIST_LIMIT: u32 = 20;

/// Characters of each signed URL echoed to the log
const SIGNED_URL_PREVIEW_CHARS: usize = 100;

/// The entity the walkthrough onboards
#[derive(Debug, Clone)]
pub struct ExampleTarget {
    pub external_entity_id: String,
    pub name: String,
    pub metadata: Map<String, Value>,
}

impl Default for ExampleTarget {
    fn default() -> Self {
        let mut metadata = Map::new();
        metadata.insert("sector".to_string(), json!("FinTech"));
        metadata.insert("example_run".to_string(), json!(true));

        Self {
            external_entity_id: "stenn".to_string(),
            name: "Stenn Technologies".to_string(),
            metadata,
        }
    }
}

impl ExampleTarget {
    /// Stable key so re-running the walkthrough never submits twice
    pub fn idempotency_key(&self) -> String {
        format!("submit-{}-v1", self.external_entity_id)
    }

    fn submit_request(&self) -> SubmitEntityRequest {
        SubmitEntityRequest::new()
            .external_entity_id(&self.external_entity_id)
            .name(&self.name)
            .metadata(self.metadata.clone())
            .force(false)
            .adverse_news_only(false)
            .idempotency_key(self.idempotency_key())
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct FlowSummary {
    pub entity_id: String,
    pub downloads: DownloadReport,
    pub entity_count: usize,
}

/// Run the walkthrough, logging each step.
///
/// Errors are logged here and then returned unchanged.
pub async fn run_example<C>(client: &C, config: &Config, target: &ExampleTarget) -> Result<FlowSummary>
where
    C: CrebainApi + ?Sized,
{
    log::info!("✅ Loaded config");
    log::info!("   Base URL: {}", config.base_url);
    log::info!("   Download dir: {}", config.download_dir.display());

    match run_steps(client, config, target).await {
        Ok(summary) => {
            log::info!("");
            log::info!("🎉 Finished successfully.");
            Ok(summary)
        }
        Err(err) => {
            match err.as_remote() {
                Some(remote) => log_api_error(remote),
                None => log_unexpected_error(&err),
            }
            Err(err)
        }
    }
}

async fn run_steps<C>(client: &C, config: &Config, target: &ExampleTarget) -> Result<FlowSummary>
where
    C: CrebainApi + ?Sized,
{
    log::info!("");
    log::info!("STEP 1) Entity submit / onboarding");
    let result = client.submit_entity(&target.submit_request()).await?;
    log_submit_result(&result);

    log::info!("");
    log::info!("STEP 2) Files currently available (if returned)");
    log_files(&result.existing_files);

    log::info!("");
    log::info!("STEP 3) Download available files (if signed URLs exist)");
    let downloads =
        download_signed_files(&result.existing_files, &config.download_dir, config.timeout)
            .await?;

    log::info!("");
    log::info!("STEP 4) List entities (sanity check)");
    let page = client.list_entities(ENTITY_LIST_LIMIT, None).await?;
    log::info!(
        "✅ Returned {} entities (showing up to {})",
        page.entities.len(),
        ENTITY_LIST_LIMIT
    );
    for entity in &page.entities {
        log::info!(
            "   - {} | external={} | id={}",
            or_placeholder(entity.name.as_deref(), "None"),
            or_placeholder(entity.external_entity_id.as_deref(), "None"),
            or_placeholder(entity.id(), "None"),
        );
    }

    Ok(FlowSummary {
        entity_id: result.entity_id,
        downloads,
        entity_count: page.entities.len(),
    })
}

fn log_submit_result(result: &EntitySubmitResult) {
    log::info!("✅ Entity submit result");
    log::info!("   entity_id={}", result.entity_id);
    log::info!("   new_company={}", result.new_company);
    log::info!("   request_submitted={}", result.request_submitted);
    if let Some(ref async_request_id) = result.async_request_id {
        log::info!("   async_request_id={}", async_request_id);
    }
}

fn log_files(files: &[FileItem]) {
    log::info!("   existing_files={}", files.len());

    for file in files {
        log::info!(
            "   - {} | mime={} | file_id={}",
            or_placeholder(file.display_name(), "unknown"),
            or_placeholder(file.mime_type.as_deref(), "unknown"),
            or_placeholder(file.id(), "unknown"),
        );
        if let Some(url) = file.url() {
            log::info!("     signed_url={}", preview(url, SIGNED_URL_PREVIEW_CHARS));
        }
    }
}

fn log_api_error(err: &RemoteError) {
    log::error!("{}", RULE);
    log::error!("❌ API ERROR");
    log::error!("   status={}", err.status);
    log::error!("   code={}", err.code);
    log::error!("   request_id={}", or_placeholder(err.request_id.as_deref(), "None"));
    log::error!("   message={}", err.message);
    if let Some(ref body) = err.response_body {
        log::error!("   response_body={}", body);
    }
}

fn log_unexpected_error(err: &Error) {
    log::error!("⚠️ Unexpected error: {}", err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        log::error!("   caused by: {}", cause);
        source = cause.source();
    }
    log::debug!("{:?}", err);
}
