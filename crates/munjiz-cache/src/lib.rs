//! Durable key-value storage for the Munjiz storefront.
//!
//! Values are stored whole: every `set` replaces the previous value for the
//! key, and every `get` returns a complete value or nothing. Callers that
//! need structured data use [`Cache`], which adds JSON serialization on top
//! of any [`KeyValueStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use munjiz_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("@cart_items", &items).await?;
//!
//! // Retrieve a value
//! let items: Option<Vec<CartLineItem>> = cache.get("@cart_items").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
