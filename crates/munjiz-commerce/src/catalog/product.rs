//! Catalog product records.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Product is listed and can be ordered.
    #[default]
    Active,
    /// Product is hidden from the storefront.
    Inactive,
    /// Product was removed; kept only so old orders resolve.
    Deleted,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Deleted => "deleted",
        }
    }
}

/// A product as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    /// Selectable sizes; empty when the product has no size choice.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Selectable colors; empty when the product has no color choice.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Missing on older records, which are all active.
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    /// Check if the product can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Whether `size` is one of the product's sizes. An empty size is
    /// accepted for products without size choices.
    pub fn offers_size(&self, size: &str) -> bool {
        offers(&self.sizes, size)
    }

    /// Whether `color` is one of the product's colors. An empty color is
    /// accepted for products without color choices.
    pub fn offers_color(&self, color: &str) -> bool {
        offers(&self.colors, color)
    }
}

fn offers(choices: &[String], choice: &str) -> bool {
    if choices.is_empty() {
        choice.is_empty()
    } else {
        choices.iter().any(|c| c == choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api() {
        let product: Product = serde_json::from_str(
            r#"{
                "_id": "P1",
                "name": "Tee",
                "price": 12.5,
                "image": "/uploads/tee.jpg",
                "category": "shirts",
                "sizes": ["S", "M"],
                "colors": ["black"],
                "createdAt": "2024-05-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(product.id.as_str(), "P1");
        assert_eq!(product.price, Money::new(1250));
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.is_available());
        assert!(product.offers_size("M"));
        assert!(!product.offers_size("XL"));
        assert!(!product.offers_color(""));
    }

    #[test]
    fn test_product_without_variants() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "P2", "name": "Cap", "price": 5, "status": "inactive"}"#,
        )
        .unwrap();

        assert!(product.sizes.is_empty());
        assert!(product.offers_size(""));
        assert!(product.offers_color(""));
        assert!(!product.is_available());
        assert_eq!(product.status.as_str(), "inactive");
    }
}
