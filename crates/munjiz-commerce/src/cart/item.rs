//! Cart line items and their identity.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// Identity of a line item.
///
/// Two line items with the same product, size and color are the same line.
/// An empty size or color is a legitimate value meaning "no variant chosen".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineItemKey {
    pub fn new(
        product_id: impl Into<ProductId>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }

    fn matches(&self, product_id: &ProductId, size: &str, color: &str) -> bool {
        &self.product_id == product_id && self.size == size && self.color == color
    }
}

/// A product as it is added to the cart, before a quantity is chosen.
///
/// Name, image and price are snapshotted from the catalog at add time and
/// are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Money,
    pub size: String,
    pub color: String,
}

impl NewLineItem {
    /// Create an item with no image and no variant selected.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            image: String::new(),
            unit_price,
            size: String::new(),
            color: String::new(),
        }
    }

    /// Snapshot a catalog product with the chosen size and color.
    ///
    /// Later changes to the product's name, image or price do not reach
    /// lines already built from it.
    pub fn from_product(
        product: &Product,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            unit_price: product.price,
            size: size.into(),
            color: color.into(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.product_id.clone(), self.size.clone(), self.color.clone())
    }

    /// Attach a quantity, producing a cart line.
    pub fn with_quantity(self, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: self.product_id,
            name: self.name,
            image: self.image,
            unit_price: self.unit_price,
            size: self.size,
            color: self.color,
            quantity,
        }
    }
}

/// One line of the cart.
///
/// Persisted as `{"id","name","image","price","size","color","quantity"}`,
/// the layout carts were saved in before this client existed; `productId` is
/// accepted as an alias for `id` when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(deserialize_with = "stored_quantity")]
    pub quantity: u32,
}

impl CartLineItem {
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.product_id.clone(), self.size.clone(), self.color.clone())
    }

    pub(crate) fn has_key(&self, key: &LineItemKey) -> bool {
        key.matches(&self.product_id, &self.size, &self.color)
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.times(u64::from(self.quantity))
    }
}

/// Older clients saved whatever quantity they were given, including negative
/// and fractional ones. Anything below one reads as zero so the line is
/// dropped when the cart is rebuilt.
fn stored_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let quantity = f64::deserialize(deserializer)?;
    // `as` truncates toward zero and saturates.
    Ok(if quantity >= 1.0 { quantity as u32 } else { 0 })
}
