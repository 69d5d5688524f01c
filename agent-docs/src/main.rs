use agent_docs::cli::{run, Cli};
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry AGENT_DOCS_* overrides
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "agent-docs starting");

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "agent-docs failed");
    }
    result
}
