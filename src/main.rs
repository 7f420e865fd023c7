use anyhow::Result;
use llm_logger::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
