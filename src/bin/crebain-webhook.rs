//! Crebain webhook receiver
//!
//! With no flags, serves `POST /webhook` and `GET /health`. `--register` and
//! `--list` manage webhook subscriptions instead.

use clap::Parser;

use crebain_examples::client::CrebainClient;
use crebain_examples::config::{Config, WebhookConfig};
use crebain_examples::error::Result;
use crebain_examples::logging;
use crebain_examples::webhook::{self, HmacVerifier};

/// Crebain webhook receiver and subscription manager
#[derive(Parser, Debug)]
#[command(name = "crebain-webhook")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Register this public URL as a webhook endpoint (e.g. https://xxx.ngrok.io/webhook)
    #[arg(long, value_name = "URL", conflicts_with = "list")]
    register: Option<String>,

    /// List registered webhooks
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(url) = cli.register {
        let config = Config::from_env()?;
        let client = CrebainClient::from_config(&config)?;
        let secret = WebhookConfig::secret_from_env();
        webhook::register_webhook(&client, &url, &secret).await?;
        return Ok(());
    }

    if cli.list {
        let config = Config::from_env()?;
        let client = CrebainClient::from_config(&config)?;
        webhook::list_webhooks(&client).await?;
        return Ok(());
    }

    let webhook_config = WebhookConfig::from_env()?;
    let verifier = HmacVerifier::new(&webhook_config.secret);
    webhook::serve(&webhook_config, verifier).await
}
