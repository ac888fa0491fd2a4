//! Order API contract and cart checkout.

use crate::cart::CartStore;
use crate::checkout::{
    CreateOrderRequest, CustomerDetails, Order, OrderEdit, OrderStatus, UpdateOrderRequest,
};
use crate::ids::OrderId;
use crate::money::Money;
use crate::CommerceError;
use async_trait::async_trait;
use munjiz_cache::KeyValueStore;
use thiserror::Error;

/// Failures reported by the order API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The server answered with an error status.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// The request was sent but nothing came back.
    #[error("No response from server")]
    NoResponse,

    /// The server answered with something that isn't an order.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The order API. Implementations own transport, auth and retries.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order and return it with its assigned id.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, OrderError>;

    /// Replace the editable fields of an existing order.
    async fn update_order(
        &self,
        id: &OrderId,
        request: &UpdateOrderRequest,
    ) -> Result<Order, OrderError>;
}

/// Submit the current cart as an order.
///
/// The cart is cleared only after the gateway accepts the order. On failure
/// the cart is left as it was and the error is returned for the screen to
/// show; nothing is retried here.
pub async fn submit_cart_order<S, G>(
    store: &CartStore<S>,
    gateway: &G,
    details: &CustomerDetails,
    shipping: Money,
    discount: Money,
) -> Result<Order, CommerceError>
where
    S: KeyValueStore,
    G: OrderGateway + ?Sized,
{
    let request = CreateOrderRequest::from_cart(&store.cart(), details, shipping, discount)?;

    match gateway.create_order(&request).await {
        Ok(order) => {
            store.clear_cart();
            tracing::info!(
                order_id = %order.id,
                lines = request.items.len(),
                total = %request.total,
                "order created"
            );
            Ok(order)
        }
        Err(error) => {
            tracing::warn!(%error, lines = request.items.len(), "order submission failed");
            Err(error.into())
        }
    }
}

/// Send an edited order back to the API.
///
/// Shipping and discount are read from form text the same way the edit
/// screen's totals are. The edit is left untouched either way so a failed
/// update can be retried by the caller.
pub async fn submit_order_update<G>(
    gateway: &G,
    edit: &OrderEdit,
    details: &CustomerDetails,
    shipping: &str,
    discount: &str,
    status: OrderStatus,
) -> Result<Order, CommerceError>
where
    G: OrderGateway + ?Sized,
{
    let request = edit.to_update_request(details, shipping, discount, status)?;

    match gateway.update_order(edit.order_id(), &request).await {
        Ok(order) => {
            tracing::info!(
                order_id = %edit.order_id(),
                lines = request.items.len(),
                status = request.status.as_str(),
                "order updated"
            );
            Ok(order)
        }
        Err(error) => {
            tracing::warn!(order_id = %edit.order_id(), %error, "order update failed");
            Err(error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewLineItem;
    use munjiz_cache::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGateway {
        fail: bool,
        received: Mutex<Vec<CreateOrderRequest>>,
        updates: Mutex<Vec<(OrderId, UpdateOrderRequest)>>,
    }

    fn order(id: &str, shipping: Money, discount: Money, total: Money) -> Order {
        Order {
            id: OrderId::new(id),
            items: Vec::new(),
            address: String::new(),
            shipping,
            discount,
            total,
            status: OrderStatus::Pending,
            customer_name: None,
            phone_number: None,
            notes: None,
            customer_notes: None,
            facebook_profile: None,
            created_at: None,
        }
    }

    #[async_trait]
    impl OrderGateway for FakeGateway {
        async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, OrderError> {
            self.received.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(OrderError::Rejected {
                    status: 422,
                    message: "Failed to create order".to_string(),
                });
            }
            Ok(order("o1", request.shipping, request.discount, request.total))
        }

        async fn update_order(
            &self,
            id: &OrderId,
            request: &UpdateOrderRequest,
        ) -> Result<Order, OrderError> {
            self.updates
                .lock()
                .unwrap()
                .push((id.clone(), request.clone()));
            if self.fail {
                return Err(OrderError::NoResponse);
            }
            let mut updated = order(id.as_str(), request.shipping, request.discount, Money::zero());
            updated.status = request.status;
            Ok(updated)
        }
    }

    async fn store_with_tee() -> CartStore<MemoryStore> {
        let store = CartStore::with_key(MemoryStore::new(), "@cart_items");
        store.load().await;
        store.add_to_cart(NewLineItem::new("P1", "Tee", Money::new(1000)), 2);
        store
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let store = store_with_tee().await;
        let gateway = FakeGateway::default();

        let order = submit_cart_order(
            &store,
            &gateway,
            &CustomerDetails::default(),
            Money::new(500),
            Money::zero(),
        )
        .await
        .unwrap();

        assert_eq!(order.total, Money::new(2500));
        assert_eq!(store.get_cart_count(), 0);
        assert_eq!(gateway.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_cart() {
        let store = store_with_tee().await;
        let gateway = FakeGateway {
            fail: true,
            ..FakeGateway::default()
        };

        let result = submit_cart_order(
            &store,
            &gateway,
            &CustomerDetails::default(),
            Money::zero(),
            Money::zero(),
        )
        .await;

        assert!(matches!(
            result,
            Err(CommerceError::OrderSubmission(OrderError::Rejected { status: 422, .. }))
        ));
        assert_eq!(store.get_cart_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_gateway() {
        let store = CartStore::with_key(MemoryStore::new(), "@cart_items");
        store.load().await;
        let gateway = FakeGateway::default();

        let result = submit_cart_order(
            &store,
            &gateway,
            &CustomerDetails::default(),
            Money::zero(),
            Money::zero(),
        )
        .await;

        assert!(matches!(result, Err(CommerceError::EmptyCart)));
        assert!(gateway.received.lock().unwrap().is_empty());
    }

    fn existing_order() -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": "o7",
            "items": [
                {"prod_id": "P1", "count": 2, "price": 10},
                {"prod_id": "P2", "count": 1, "price": 5}
            ],
            "shipping": 3,
            "total": 28
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_order_update_is_sent() {
        let gateway = FakeGateway::default();
        let mut edit = OrderEdit::from_order(&existing_order());
        edit.remove_line(1).unwrap();

        let updated = submit_order_update(
            &gateway,
            &edit,
            &CustomerDetails::default(),
            "4",
            "",
            OrderStatus::Shipped,
        )
        .await
        .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        let updates = gateway.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0.as_str(), "o7");
        assert_eq!(updates[0].1.items.len(), 1);
        assert_eq!(updates[0].1.shipping, Money::new(400));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_edit() {
        let gateway = FakeGateway {
            fail: true,
            ..FakeGateway::default()
        };
        let edit = OrderEdit::from_order(&existing_order());

        let result = submit_order_update(
            &gateway,
            &edit,
            &CustomerDetails::default(),
            "3",
            "0",
            OrderStatus::Paid,
        )
        .await;

        assert!(matches!(
            result,
            Err(CommerceError::OrderSubmission(OrderError::NoResponse))
        ));
        assert_eq!(edit.lines().len(), 2);
    }
}
