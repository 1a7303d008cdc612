//! Vehicle Pricing Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("PRICER_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    init_logging(config.log_level()?);

    info!("=== Vehicle Pricing Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Datasets: bikes={}, cars={}",
        config.data.bikes_path.display(),
        config.data.cars_path.display()
    );

    run_server(config).await.context("server error")?;

    Ok(())
}
