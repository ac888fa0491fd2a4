//! Order types exchanged with the order API.

use crate::cart::{Cart, OrderTotals, PricedLine};
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting payment.
    #[default]
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// A product reference inside an order line. The API returns either the
/// bare id or the populated product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Expanded {
        #[serde(rename = "_id")]
        id: ProductId,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

impl ProductRef {
    pub fn id(&self) -> &ProductId {
        match self {
            ProductRef::Id(id) => id,
            ProductRef::Expanded { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ProductRef::Id(_) => None,
            ProductRef::Expanded { name, .. } => Some(name),
        }
    }
}

/// A line of an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub prod_id: ProductRef,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: Money,
}

impl PricedLine for OrderLine {
    fn unit_price(&self) -> Money {
        self.price
    }

    fn count(&self) -> u64 {
        u64::from(self.count)
    }
}

/// An order as returned by the order API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub shipping: Money,
    #[serde(default)]
    pub discount: Money,
    pub total: Money,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Order {
    /// Recompute totals from the order's own lines, shipping and discount.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::compute(&self.items, self.shipping, self.discount)
    }
}

/// Customer fields entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub user_name: String,
    pub phone_number: String,
    pub address: String,
    pub notes: Option<String>,
    pub user_notes: Option<String>,
    pub facebook_profile: Option<String>,
}

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub prod_id: ProductId,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: Money,
}

impl PricedLine for OrderItemRequest {
    fn unit_price(&self) -> Money {
        self.price
    }

    fn count(&self) -> u64 {
        u64::from(self.count)
    }
}

/// Body of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub user_name: String,
    pub phone_number: String,
    pub address: String,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_profile: Option<String>,
}

impl CreateOrderRequest {
    /// Build a submission from a cart snapshot.
    ///
    /// Each cart line becomes one order line at its snapshotted price; an
    /// empty size or color is omitted. Shipping, discount and total follow
    /// [`OrderTotals`].
    pub fn from_cart(
        cart: &Cart,
        details: &CustomerDetails,
        shipping: Money,
        discount: Money,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let items: Vec<OrderItemRequest> = cart
            .items()
            .iter()
            .map(|item| OrderItemRequest {
                prod_id: item.product_id.clone(),
                count: item.quantity,
                size: non_empty(&item.size),
                color: non_empty(&item.color),
                price: item.unit_price,
            })
            .collect();
        let totals = OrderTotals::compute(&items, shipping, discount);

        Ok(Self {
            items,
            user_name: details.user_name.clone(),
            phone_number: details.phone_number.clone(),
            address: details.address.clone(),
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            notes: details.notes.clone(),
            user_notes: details.user_notes.clone(),
            facebook_profile: details.facebook_profile.clone(),
        })
    }
}

/// Body of an order update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub user_name: String,
    pub phone_number: String,
    pub address: String,
    pub shipping: Money,
    pub discount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: OrderStatus,
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewLineItem;

    fn details() -> CustomerDetails {
        CustomerDetails {
            user_name: "Lina".to_string(),
            phone_number: "0790000000".to_string(),
            address: "Amman".to_string(),
            ..CustomerDetails::default()
        }
    }

    #[test]
    fn test_request_from_cart() {
        let mut cart = Cart::new();
        cart.add_item(
            NewLineItem::new("P1", "Tee", Money::new(1000)).with_size("M"),
            2,
        );
        cart.add_item(NewLineItem::new("P2", "Cap", Money::new(500)), 1);

        let request =
            CreateOrderRequest::from_cart(&cart, &details(), Money::new(300), Money::new(100))
                .unwrap();

        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].size.as_deref(), Some("M"));
        assert_eq!(request.items[1].size, None);
        assert_eq!(request.total, Money::new(2700));
    }

    #[test]
    fn test_request_wire_format() {
        let mut cart = Cart::new();
        cart.add_item(NewLineItem::new("P1", "Tee", Money::new(1050)), 1);
        let request =
            CreateOrderRequest::from_cart(&cart, &details(), Money::zero(), Money::zero()).unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["prod_id"], "P1");
        assert_eq!(json["items"][0]["price"], 10.5);
        assert_eq!(json["userName"], "Lina");
        assert_eq!(json["total"], 10.5);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let result =
            CreateOrderRequest::from_cart(&Cart::new(), &details(), Money::zero(), Money::zero());
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
    }

    #[test]
    fn test_order_from_api() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o1",
                "user": "u1",
                "items": [
                    {"prod_id": {"_id": "P1", "name": "Tee"}, "count": 2, "size": "M", "price": 10},
                    {"prod_id": "P2", "count": 1, "price": 5}
                ],
                "address": "Amman",
                "shipping": 3,
                "total": 28,
                "status": "shipped"
            }"#,
        )
        .unwrap();

        assert_eq!(order.items[0].prod_id.id().as_str(), "P1");
        assert_eq!(order.items[0].prod_id.name(), Some("Tee"));
        assert_eq!(order.items[1].prod_id.name(), None);
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.discount, Money::zero());
        assert_eq!(order.totals().total, Money::new(2800));
    }

    #[test]
    fn test_status_terminal() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert_eq!(OrderStatus::default().as_str(), "pending");
    }
}
