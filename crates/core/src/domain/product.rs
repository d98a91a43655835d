use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<u64>().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub sku: String,
}

/// Caller-supplied fields for a new product. Never stored as-is; the catalog
/// assigns an id and turns it into a [`Product`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub sku: String,
}

/// Partial update. Absent fields keep the stored value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Product {
    pub fn from_details(id: ProductId, details: ProductDetails) -> Self {
        Self {
            id,
            name: details.name,
            price: details.price,
            stock: details.stock,
            sku: details.sku,
        }
    }

    /// Returns a copy with the patch applied on top. The id is never touched.
    pub fn merged(&self, patch: ProductPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            price: patch.price.unwrap_or(self.price),
            stock: patch.stock.unwrap_or(self.stock),
            sku: patch.sku.unwrap_or_else(|| self.sku.clone()),
        }
    }
}

impl From<ProductDetails> for ProductPatch {
    fn from(details: ProductDetails) -> Self {
        Self {
            name: Some(details.name),
            price: Some(details.price),
            stock: Some(details.stock),
            sku: Some(details.sku),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductDetails, ProductId, ProductPatch};

    fn aspirin() -> Product {
        Product::from_details(
            ProductId(7),
            ProductDetails {
                name: "Aspirin".to_string(),
                price: 5.0,
                stock: 100,
                sku: "ASP-1".to_string(),
            },
        )
    }

    #[test]
    fn merge_keeps_fields_missing_from_patch() {
        let stored = aspirin();
        let merged = stored.merged(ProductPatch { price: Some(6.5), ..ProductPatch::default() });

        assert_eq!(merged.id, ProductId(7));
        assert_eq!(merged.price, 6.5);
        assert_eq!(merged.name, "Aspirin");
        assert_eq!(merged.stock, 100);
        assert_eq!(merged.sku, "ASP-1");
    }

    #[test]
    fn full_details_patch_replaces_every_field_but_id() {
        let stored = aspirin();
        let merged = stored.merged(ProductPatch::from(ProductDetails {
            name: "Ibuprofen".to_string(),
            price: 8.0,
            stock: 3,
            sku: "IBU-1".to_string(),
        }));

        assert_eq!(merged.id, stored.id);
        assert_eq!(merged.name, "Ibuprofen");
        assert_eq!(merged.sku, "IBU-1");
    }

    #[test]
    fn patch_deserializes_with_missing_fields() {
        let patch: ProductPatch =
            serde_json::from_str(r#"{"stock": 4}"#).expect("partial patch should parse");

        assert_eq!(patch, ProductPatch { stock: Some(4), ..ProductPatch::default() });
    }

    #[test]
    fn product_id_parses_only_non_negative_integers() {
        assert_eq!("12".parse::<ProductId>().ok(), Some(ProductId(12)));
        assert!("-1".parse::<ProductId>().is_err());
        assert!("abc".parse::<ProductId>().is_err());
        assert!(" 0".parse::<ProductId>().is_err());
        assert!("0 ".parse::<ProductId>().is_err());
    }

    #[test]
    fn product_serializes_id_as_plain_integer() {
        let value = serde_json::to_value(aspirin()).expect("serialize product");
        assert_eq!(value["id"], 7);
        assert_eq!(value["sku"], "ASP-1");
    }
}
