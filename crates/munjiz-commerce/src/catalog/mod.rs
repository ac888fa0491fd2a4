//! Catalog module.
//!
//! Products as the catalog API returns them. Cart lines copy what they need
//! from a product when it is added and never look it up again.

mod product;

pub use product::{Product, ProductStatus};
