use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    alphaloop_cli::cli::app::run().await
}
