//! Editing an existing order's lines.

use crate::cart::OrderTotals;
use crate::checkout::order::non_empty;
use crate::checkout::{
    CustomerDetails, Order, OrderItemRequest, OrderLine, OrderStatus, ProductRef,
    UpdateOrderRequest,
};
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use crate::CommerceError;

/// A working copy of an order's lines.
///
/// Unlike the cart, lines are addressed by position and a new line is never
/// merged into an existing one. An order always keeps at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEdit {
    order_id: OrderId,
    lines: Vec<OrderLine>,
}

impl OrderEdit {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            lines: order.items.clone(),
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Set a line's count. Counts below one are rejected rather than
    /// removing the line.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CommerceError> {
        let count = u32::try_from(quantity)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or(CommerceError::InvalidQuantity(quantity))?;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CommerceError::LineNotFound(index))?;
        line.count = count;
        Ok(())
    }

    /// Remove a line, unless it is the only one left.
    pub fn remove_line(&mut self, index: usize) -> Result<OrderLine, CommerceError> {
        if index >= self.lines.len() {
            return Err(CommerceError::LineNotFound(index));
        }
        if self.lines.len() == 1 {
            return Err(CommerceError::LastOrderLine);
        }
        Ok(self.lines.remove(index))
    }

    /// Append a line for a product at its current catalog price.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        size: &str,
        color: &str,
        price: Money,
        count: u32,
    ) -> Result<(), CommerceError> {
        if count == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        self.lines.push(OrderLine {
            prod_id: ProductRef::Id(product_id),
            count,
            size: non_empty(size),
            color: non_empty(color),
            price,
        });
        Ok(())
    }

    /// Totals with shipping and discount taken from form text.
    pub fn totals(&self, shipping: &str, discount: &str) -> OrderTotals {
        OrderTotals::from_form(&self.lines, shipping, discount)
    }

    /// Build the update body. Shipping and discount are coerced from form
    /// text the same way [`OrderEdit::totals`] reads them.
    pub fn to_update_request(
        &self,
        details: &CustomerDetails,
        shipping: &str,
        discount: &str,
        status: OrderStatus,
    ) -> Result<UpdateOrderRequest, CommerceError> {
        if self.lines.is_empty() {
            return Err(CommerceError::EmptyOrder);
        }
        let totals = self.totals(shipping, discount);

        Ok(UpdateOrderRequest {
            items: self
                .lines
                .iter()
                .map(|line| OrderItemRequest {
                    prod_id: line.prod_id.id().clone(),
                    count: line.count,
                    size: line.size.clone(),
                    color: line.color.clone(),
                    price: line.price,
                })
                .collect(),
            user_name: details.user_name.clone(),
            phone_number: details.phone_number.clone(),
            address: details.address.clone(),
            shipping: totals.shipping,
            discount: totals.discount,
            notes: details.notes.clone(),
            status,
        })
    }
}
