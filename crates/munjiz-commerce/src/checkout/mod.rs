//! Checkout module.
//!
//! Contains the order API contract, order submission from the cart and
//! editing of existing orders.

mod edit;
mod gateway;
mod order;

pub use edit::OrderEdit;
pub use gateway::{submit_cart_order, submit_order_update, OrderError, OrderGateway};
pub use order::{
    CreateOrderRequest, CustomerDetails, Order, OrderItemRequest, OrderLine, OrderStatus,
    ProductRef, UpdateOrderRequest,
};
