//! The in-memory cart.

use crate::cart::{CartLineItem, LineItemKey, NewLineItem};
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An ordered list of line items.
///
/// Invariants held by every method:
/// - no two lines share a [`LineItemKey`];
/// - every line has a quantity of at least 1.
///
/// Order only matters for display; new lines are appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Stored data may predate the invariants, so zero-quantity lines are
    /// dropped and duplicate keys are merged into the first occurrence.
    pub fn from_snapshot(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            let quantity = item.quantity;
            let new_item = NewLineItem {
                product_id: item.product_id,
                name: item.name,
                image: item.image,
                unit_price: item.unit_price,
                size: item.size,
                color: item.color,
            };
            cart.add_item(new_item, quantity);
        }
        cart
    }

    /// Add `quantity` of an item.
    ///
    /// If a line with the same key exists its quantity grows by `quantity`
    /// and its stored name, image and price are kept; otherwise a new line
    /// is appended. Quantities saturate at `u32::MAX` rather than wrap.
    ///
    /// Returns `false` and leaves the cart untouched when `quantity` is 0.
    pub fn add_item(&mut self, item: NewLineItem, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }

        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|i| i.has_key(&key)) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return true;
        }

        self.items.push(item.with_quantity(quantity));
        true
    }

    /// Set the quantity of a line to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Returns whether a line
    /// with that key existed.
    pub fn update_quantity(&mut self, key: &LineItemKey, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(key);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        match self.items.iter_mut().find(|i| i.has_key(key)) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns whether it existed.
    pub fn remove_item(&mut self, key: &LineItemKey) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| !i.has_key(key));
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `unit_price × quantity` over all lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Get the line with exactly this key.
    pub fn get(&self, key: &LineItemKey) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.has_key(key))
    }

    /// First line (in display order) for any variant of a product.
    pub fn find_product(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// All lines for a product, one per variant.
    pub fn variants_of<'a>(
        &'a self,
        product_id: &'a ProductId,
    ) -> impl Iterator<Item = &'a CartLineItem> + 'a {
        self.items.iter().filter(move |i| &i.product_id == product_id)
    }
}
