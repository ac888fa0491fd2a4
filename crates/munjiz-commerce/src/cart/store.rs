//! Shared cart store with background persistence.
//!
//! Every mutation is applied to memory immediately and then handed to a
//! single writer task as a full snapshot. The hand-off goes through a
//! `watch` channel, which only ever holds the newest snapshot: if several
//! mutations land while a write is in flight, the writer skips straight to
//! the latest one. Writes never overlap, so the last value persisted is
//! always the last value in memory.

use crate::cart::{Cart, CartLineItem, LineItemKey, NewLineItem};
use crate::config::CartConfig;
use crate::ids::ProductId;
use crate::money::Money;
use munjiz_cache::{Cache, CacheError, KeyValueStore};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// What screens see of the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
    /// True until the stored cart has been read.
    pub is_loading: bool,
}

/// Result of a product-level cart lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemMatch {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

/// A numbered full snapshot of the cart, as handed to the writer.
#[derive(Debug, Clone)]
struct Snapshot {
    version: u64,
    items: Arc<Vec<CartLineItem>>,
}

#[derive(Debug)]
struct Inner {
    cart: Cart,
    is_loading: bool,
    /// Bumped by every published mutation.
    version: u64,
    writer_started: bool,
}

struct Shared<S> {
    cache: Arc<Cache<S>>,
    storage_key: String,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<Snapshot>,
    /// Version of the newest snapshot whose write has finished, whether it
    /// succeeded or not.
    settled: Arc<watch::Sender<u64>>,
    states: watch::Sender<CartState>,
}

/// Handle to the app-wide cart.
///
/// Clones share the same cart; hand one to every screen that needs it.
/// Mutations take effect synchronously and persist in the background.
pub struct CartStore<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty store that is still loading.
    ///
    /// Nothing is read or written until [`CartStore::load`] runs.
    pub fn new(storage: S, config: &CartConfig) -> Self {
        Self::with_key(storage, config.storage_key.clone())
    }

    /// Create a store that persists under `storage_key`.
    pub fn with_key(storage: S, storage_key: impl Into<String>) -> Self {
        let initial = Snapshot {
            version: 0,
            items: Arc::new(Vec::new()),
        };
        let (snapshots, _) = watch::channel(initial);
        let (settled, _) = watch::channel(0);
        let (states, _) = watch::channel(CartState {
            items: Vec::new(),
            is_loading: true,
        });

        Self {
            shared: Arc::new(Shared {
                cache: Arc::new(Cache::new(storage)),
                storage_key: storage_key.into(),
                inner: Mutex::new(Inner {
                    cart: Cart::new(),
                    is_loading: true,
                    version: 0,
                    writer_started: false,
                }),
                snapshots,
                settled: Arc::new(settled),
                states,
            }),
        }
    }

    /// Read the stored cart and start persisting changes.
    ///
    /// A missing value, a failed read and unparseable data all produce an
    /// empty cart; individual unreadable lines are skipped. The stored cart replaces whatever is in memory; changes
    /// made before loading finished are discarded. Calling this again after
    /// a successful load does nothing.
    pub async fn load(&self) {
        if self.lock().writer_started {
            return;
        }

        let key = self.shared.storage_key.as_str();
        let stored = match self.shared.cache.get::<Vec<serde_json::Value>>(key).await {
            Ok(Some(lines)) => read_lines(key, lines),
            Ok(None) => Vec::new(),
            Err(CacheError::SerializeError(error)) => {
                tracing::warn!(key, %error, "stored cart is unreadable, starting empty");
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(key, %error, "failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        let mut inner = self.lock();
        if inner.writer_started {
            return;
        }
        if !inner.cart.is_empty() {
            tracing::warn!(
                discarded_lines = inner.cart.line_count(),
                "cart changed while loading; stored cart wins"
            );
        }

        inner.cart = Cart::from_snapshot(stored);
        inner.is_loading = false;
        inner.writer_started = true;
        tracing::info!(
            key,
            lines = inner.cart.line_count(),
            count = inner.cart.count(),
            "cart loaded"
        );

        // Everything published so far predates the load and must not be
        // written over the stored cart.
        let receiver = self.shared.snapshots.subscribe();
        self.shared.settled.send_replace(inner.version);
        self.shared.states.send_replace(CartState {
            items: inner.cart.items().to_vec(),
            is_loading: false,
        });
        drop(inner);

        tokio::spawn(run_writer(
            Arc::clone(&self.shared.cache),
            self.shared.storage_key.clone(),
            receiver,
            Arc::clone(&self.shared.settled),
        ));
    }

    /// Add `quantity` of an item, merging with an existing line that has the
    /// same product, size and color.
    ///
    /// A quantity of zero is ignored: nothing changes and nothing is written.
    pub fn add_to_cart(&self, item: NewLineItem, quantity: u32) {
        if quantity == 0 {
            tracing::debug!(product_id = %item.product_id, "ignoring add with zero quantity");
            return;
        }
        let product_id = item.product_id.clone();
        self.mutate(|cart| {
            cart.add_item(item, quantity);
        });
        tracing::debug!(%product_id, quantity, "added to cart");
    }

    /// Remove the line with this product, size and color, if present.
    pub fn remove_from_cart(&self, product_id: &ProductId, size: &str, color: &str) {
        let key = LineItemKey::new(product_id.clone(), size, color);
        self.mutate(|cart| {
            cart.remove_item(&key);
        });
    }

    /// Set a line's quantity to exactly `quantity`; zero or less removes it.
    /// Unknown keys are ignored.
    pub fn update_quantity(&self, product_id: &ProductId, size: &str, color: &str, quantity: i64) {
        let key = LineItemKey::new(product_id.clone(), size, color);
        self.mutate(|cart| {
            cart.update_quantity(&key, quantity);
        });
    }

    /// Empty the cart. Call after an order is accepted and on logout.
    pub fn clear_cart(&self) {
        self.mutate(Cart::clear);
        tracing::debug!("cart cleared");
    }

    /// Sum of `unit_price × quantity`.
    pub fn get_cart_total(&self) -> Money {
        self.lock().cart.total()
    }

    /// Sum of quantities, for the cart badge.
    pub fn get_cart_count(&self) -> u64 {
        self.lock().cart.count()
    }

    /// Whether any variant of a product is in the cart.
    ///
    /// Matches on product only and reports the first matching line, so a
    /// product page can show "in cart" regardless of the selected size or
    /// color. Use [`CartStore::find_item`] for an exact variant.
    pub fn is_item_in_cart(&self, product_id: &ProductId) -> Option<CartItemMatch> {
        self.lock()
            .cart
            .find_product(product_id)
            .map(|item| CartItemMatch {
                product_id: item.product_id.clone(),
                size: item.size.clone(),
                color: item.color.clone(),
                quantity: item.quantity,
            })
    }

    /// The line with exactly this product, size and color.
    pub fn find_item(&self, product_id: &ProductId, size: &str, color: &str) -> Option<CartLineItem> {
        let key = LineItemKey::new(product_id.clone(), size, color);
        self.lock().cart.get(&key).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().cart.items().to_vec()
    }

    /// A copy of the current cart.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    pub fn state(&self) -> CartState {
        let inner = self.lock();
        CartState {
            items: inner.cart.items().to_vec(),
            is_loading: inner.is_loading,
        }
    }

    /// Receive the cart state after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.shared.states.subscribe()
    }

    /// Wait until every change made so far has been written, or has failed
    /// to write. Returns immediately before the cart is loaded.
    pub async fn flush(&self) {
        let target = {
            let inner = self.lock();
            if !inner.writer_started {
                return;
            }
            inner.version
        };

        let mut settled = self.shared.settled.subscribe();
        if settled.wait_for(|version| *version >= target).await.is_err() {
            tracing::warn!("cart writer stopped before flushing");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` and publish the resulting snapshot while still holding the
    /// lock, so snapshots are published in mutation order.
    fn mutate<F: FnOnce(&mut Cart)>(&self, f: F) {
        let mut inner = self.lock();
        f(&mut inner.cart);
        inner.version += 1;

        let items = inner.cart.items().to_vec();
        self.shared.states.send_replace(CartState {
            items: items.clone(),
            is_loading: inner.is_loading,
        });
        self.shared.snapshots.send_replace(Snapshot {
            version: inner.version,
            items: Arc::new(items),
        });
    }
}

/// Parse stored lines one by one; a line that doesn't parse is skipped so
/// the rest of the cart survives.
fn read_lines(key: &str, lines: Vec<serde_json::Value>) -> Vec<CartLineItem> {
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| match serde_json::from_value(line) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::warn!(key, index, %error, "skipping unreadable cart line");
                None
            }
        })
        .collect()
}

/// Persist snapshots one at a time until every store handle is gone.
async fn run_writer<S: KeyValueStore>(
    cache: Arc<Cache<S>>,
    key: String,
    mut snapshots: watch::Receiver<Snapshot>,
    settled: Arc<watch::Sender<u64>>,
) {
    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        match cache.set(&key, snapshot.items.as_slice()).await {
            Ok(()) => tracing::debug!(
                key = %key,
                version = snapshot.version,
                lines = snapshot.items.len(),
                "cart persisted"
            ),
            Err(error) => tracing::error!(
                key = %key,
                version = snapshot.version,
                %error,
                "failed to persist cart"
            ),
        }
        settled.send_replace(snapshot.version);
    }
    tracing::debug!(key = %key, "cart writer stopped");
}
