pub mod ids;
pub mod memory;
pub mod validation;

use async_trait::async_trait;

use crate::domain::product::{Product, ProductDetails, ProductId, ProductPatch};
use crate::errors::CatalogError;

pub use ids::IdSequence;
pub use memory::InMemoryCatalog;

/// Product storage addressed by the stable product id.
///
/// Each call is one unit of work: implementations must make the whole
/// operation (lookup, validation, mutation) appear atomic to other callers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, details: ProductDetails) -> Result<Product, CatalogError>;
    async fn list(&self) -> Vec<Product>;
    async fn get(&self, id: ProductId) -> Result<Product, CatalogError>;
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError>;
    async fn delete(&self, id: ProductId) -> Result<Product, CatalogError>;
    async fn count(&self) -> usize;
}
