use crate::domain::product::{Product, ProductDetails, ProductId, ProductPatch};
use crate::errors::CatalogError;

pub fn validate_details(details: &ProductDetails) -> Result<(), CatalogError> {
    validate_name(&details.name)?;
    validate_price(details.price)?;
    validate_stock(details.stock)
}

pub fn validate_patch(patch: &ProductPatch) -> Result<(), CatalogError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(stock) = patch.stock {
        validate_stock(stock)?;
    }
    Ok(())
}

/// Fails with `DuplicateSku` when any stored product other than `except`
/// already carries `sku`.
pub fn ensure_unique_sku<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    sku: &str,
    except: Option<ProductId>,
) -> Result<(), CatalogError> {
    let taken = products
        .into_iter()
        .any(|product| Some(product.id) != except && product.sku == sku);
    if taken {
        return Err(CatalogError::DuplicateSku { sku: sku.to_string() });
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CatalogError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CatalogError::Validation("price must be greater than 0".to_string()));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<(), CatalogError> {
    if stock < 0 {
        return Err(CatalogError::Validation(
            "stock must be greater than or equal to 0".to_string(),
        ));
    }
    Ok(())
}
