pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::{CatalogStore, IdSequence, InMemoryCatalog};
pub use domain::order::{Order, OrderId, OrderStatus};
pub use domain::product::{Product, ProductDetails, ProductId, ProductPatch};
pub use errors::{CatalogError, InterfaceError};
