//! Shopping cart module.
//!
//! Contains line items, the in-memory cart, the shared persisted store and
//! order total calculations.

mod cart;
mod item;
mod pricing;
mod store;

pub use cart::Cart;
pub use item::{CartLineItem, LineItemKey, NewLineItem};
pub use pricing::{subtotal, FormLine, FormattedTotals, OrderTotals, PricedLine};
pub use store::{CartItemMatch, CartState, CartStore};
