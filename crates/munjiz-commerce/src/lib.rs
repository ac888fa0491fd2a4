//! Cart state, order totals and price formatting for the Munjiz storefront.
//!
//! - **Catalog**: product records that cart lines are built from
//! - **Cart**: line items keyed by product, size and color; a shared store
//!   that applies changes immediately and persists full snapshots in the
//!   background
//! - **Pricing**: subtotal, shipping, discount and a total floored at zero
//! - **Money**: exact amounts and per-currency display rules
//! - **Checkout**: the order API contract, submitting the cart and editing
//!   existing orders
//!
//! # Example
//!
//! ```rust,ignore
//! use munjiz_commerce::prelude::*;
//! use munjiz_cache::FileStore;
//!
//! let config = CartConfig::load("cart.toml")?;
//! let storage = FileStore::open("/var/lib/munjiz").await?;
//! let cart = CartStore::new(storage, &config);
//! cart.load().await;
//!
//! cart.add_to_cart(
//!     NewLineItem::new("P1", "Tee", Money::from_decimal(10.0))
//!         .with_size("M")
//!         .with_color("black"),
//!     1,
//! );
//!
//! let totals = OrderTotals::from_form(cart.items().iter(), "10", "");
//! println!("Total: {}", config.currency().format(totals.total));
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use config::CartConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CartConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{format_price, Currency, Money};

    // Cart
    pub use crate::cart::{
        Cart, CartItemMatch, CartLineItem, CartState, CartStore, FormLine, LineItemKey,
        NewLineItem, OrderTotals, PricedLine,
    };

    // Catalog
    pub use crate::catalog::{Product, ProductStatus};

    // Checkout
    pub use crate::checkout::{
        submit_cart_order, submit_order_update, CreateOrderRequest, CustomerDetails, Order,
        OrderEdit, OrderError, OrderGateway, OrderLine, OrderStatus,
    };
}
