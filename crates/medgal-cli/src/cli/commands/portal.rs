//! Portal launch and health check.

use anyhow::Result;
use medgal_core::api::ApiClient;
use medgal_core::config::Config;

pub async fn portal() -> Result<()> {
    let config = Config::load()?;
    medgal_tui::run_portal(config).await
}

pub async fn health() -> Result<()> {
    let config = Config::load()?;
    let api = ApiClient::new(&config.api_base_url)?;
    if api.health().await {
        println!("Backend is reachable at {}", api.base_url());
        Ok(())
    } else {
        anyhow::bail!("Backend is not reachable at {}", api.base_url());
    }
}
