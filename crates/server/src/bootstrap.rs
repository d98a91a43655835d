use std::sync::Arc;

use axum::Router;
use stockroom_core::config::{AppConfig, ConfigError, LoadOptions};
use stockroom_core::{CatalogStore, InMemoryCatalog};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::{health, products};

/// Everything the server owns for its lifetime. The catalog is created empty
/// here and dropped when the application is.
pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<dyn CatalogStore>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not bind listener on `{address}`: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads and validates configuration. Runs before logging is initialised, so
/// failures surface through the returned error only.
pub fn load_config(options: LoadOptions) -> Result<AppConfig, BootstrapError> {
    Ok(AppConfig::load(options)?)
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog: Arc<dyn CatalogStore> = Arc::new(InMemoryCatalog::new());
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        "in-memory product catalog initialized"
    );

    Application { config, catalog }
}

impl Application {
    pub fn router(&self) -> Router {
        products::router(Arc::clone(&self.catalog)).merge(health::router(Arc::clone(&self.catalog)))
    }

    pub async fn bind(&self) -> Result<TcpListener, BootstrapError> {
        let address = self.config.listen_address();
        TcpListener::bind(&address).await.map_err(|source| BootstrapError::Bind { address, source })
    }
}
