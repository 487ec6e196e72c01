//! Crebain client integration example

use crebain_examples::client::CrebainClient;
use crebain_examples::config::Config;
use crebain_examples::error::Result;
use crebain_examples::flow::{ExampleTarget, run_example};
use crebain_examples::logging;

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let client = CrebainClient::traced(&config)?;

    run_example(&client, &config, &ExampleTarget::default()).await?;
    Ok(())
}
