use crate::domain::product::ProductId;
use crate::errors::CatalogError;

/// Monotonic product id source. Every draw returns the cursor and advances
/// it; values are never handed out twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn draw(&mut self) -> Result<ProductId, CatalogError> {
        let current = self.next;
        self.next = current
            .checked_add(1)
            .ok_or_else(|| CatalogError::Internal("product id sequence exhausted".to_string()))?;
        Ok(ProductId(current))
    }

    pub fn peek(&self) -> ProductId {
        ProductId(self.next)
    }
}
