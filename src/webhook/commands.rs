//! Webhook subscription management commands

use crate::client::{CrebainApi, WebhookSubscription};
use crate::error::Result;

/// Register `url` as a webhook endpoint signed with `secret`.
pub async fn register_webhook<C>(client: &C, url: &str, secret: &str) -> Result<WebhookSubscription>
where
    C: CrebainApi + ?Sized,
{
    match client.create_webhook(url, secret).await {
        Ok(webhook) => {
            log::info!("Webhook registered successfully!");
            log::info!("  Webhook ID: {}", webhook.id);
            log::info!("  URL: {}", webhook.url);
            Ok(webhook)
        }
        Err(err) => {
            log::error!("Failed to register webhook: {}", err);
            Err(err)
        }
    }
}

/// Log every registered webhook.
pub async fn list_webhooks<C>(client: &C) -> Result<Vec<WebhookSubscription>>
where
    C: CrebainApi + ?Sized,
{
    let webhooks = client.list_webhooks().await?;

    log::info!("Registered webhooks:");
    for webhook in &webhooks {
        log::info!(
            "  - {}: {} (enabled: {})",
            webhook.id,
            webhook.url,
            webhook.enabled
        );
    }

    Ok(webhooks)
}
