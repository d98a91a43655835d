use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use stockroom_core::CatalogStore;

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<dyn CatalogStore>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: Arc<dyn CatalogStore>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { catalog })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(state.catalog.as_ref()).await;

    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "stockroom-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

async fn catalog_check(catalog: &dyn CatalogStore) -> HealthCheck {
    let count = catalog.count().await;
    HealthCheck { status: "ready", detail: format!("{count} products in catalog") }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use stockroom_core::{CatalogStore, InMemoryCatalog, ProductDetails};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog
            .create(ProductDetails {
                name: "Aspirin".to_string(),
                price: 5.0,
                stock: 100,
                sku: "ASP-1".to_string(),
            })
            .await
            .expect("create should succeed");

        let (status, Json(payload)) = health(State(HealthState { catalog })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.service.status, "ready");
        assert_eq!(payload.catalog.detail, "1 products in catalog");
    }
}
