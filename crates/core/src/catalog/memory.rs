use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::product::{Product, ProductDetails, ProductId, ProductPatch};
use crate::errors::CatalogError;

use super::validation::{ensure_unique_sku, validate_details, validate_patch};
use super::{CatalogStore, IdSequence};

/// Process-lifetime catalog. The id sequence and the product map share one
/// lock so that every operation observes and mutates them together.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    ids: IdSequence,
    // Ids only grow, so key order is insertion order.
    products: BTreeMap<ProductId, Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_sequence(ids: IdSequence) -> Self {
        Self { state: RwLock::new(CatalogState { ids, products: BTreeMap::new() }) }
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn create(&self, details: ProductDetails) -> Result<Product, CatalogError> {
        validate_details(&details)?;

        let mut state = self.state.write().await;
        ensure_unique_sku(state.products.values(), &details.sku, None)?;

        let id = state.ids.draw()?;
        let product = Product::from_details(id, details);
        state.products.insert(id, product.clone());

        info!(
            event_name = "catalog.product.created",
            product_id = %id,
            sku = %product.sku,
            catalog_size = state.products.len(),
            "product added to catalog"
        );
        Ok(product)
    }

    async fn list(&self) -> Vec<Product> {
        let state = self.state.read().await;
        state.products.values().cloned().collect()
    }

    async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        let state = self.state.read().await;
        state.products.get(&id).cloned().ok_or_else(|| CatalogError::not_found(id))
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let mut state = self.state.write().await;
        let stored = state.products.get(&id).ok_or_else(|| CatalogError::not_found(id))?;

        validate_patch(&patch)?;
        if let Some(sku) = patch.sku.as_deref().filter(|sku| *sku != stored.sku) {
            ensure_unique_sku(state.products.values(), sku, Some(id))?;
        }

        let updated = stored.merged(patch);
        state.products.insert(id, updated.clone());

        debug!(
            event_name = "catalog.product.updated",
            product_id = %id,
            sku = %updated.sku,
            "product updated in place"
        );
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut state = self.state.write().await;
        let removed = state.products.remove(&id).ok_or_else(|| CatalogError::not_found(id))?;

        info!(
            event_name = "catalog.product.deleted",
            product_id = %id,
            sku = %removed.sku,
            catalog_size = state.products.len(),
            "product removed from catalog"
        );
        Ok(removed)
    }

    async fn count(&self) -> usize {
        self.state.read().await.products.len()
    }
}
