//! Crebain API examples
//!
//! A client integration walkthrough and a webhook receiver, built on a
//! small typed client for the Crebain REST API.

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod flow;
pub mod logging;
pub mod output;
pub mod webhook;
