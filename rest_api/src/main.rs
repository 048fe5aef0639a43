use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rest_api::config::{load_rest_api_config, load_store_config};
use rest_api::start_server;
use storage::store::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let api_config = load_rest_api_config().context("Failed to load REST API configuration")?;
    let store_config = load_store_config().context("Failed to load store configuration")?;

    let store = JsonFileStore::new(store_config.data_file.clone());
    store.init().await.with_context(|| {
        format!(
            "Failed to prepare data file {}",
            store_config.data_file.display()
        )
    })?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("Ctrl-c received, shutting down.");
        let _ = shutdown_tx.send(());
    });

    start_server(&api_config, Arc::new(store), shutdown_rx).await
}
