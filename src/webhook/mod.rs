//! Webhook receiver and subscription management

pub mod commands;
pub mod server;
pub mod signature;

pub use commands::{list_webhooks, register_webhook};
pub use server::{WebhookState, build_router, serve};
pub use signature::{HmacVerifier, SignatureVerifier};
