//! Order total calculations.
//!
//! The same rules price the live cart, a new order and an order being
//! edited: `total = max(0, subtotal + shipping - discount)`. Shipping and
//! discount come straight from form fields, so every input is coerced to a
//! non-negative amount before it reaches the arithmetic.

use crate::cart::CartLineItem;
use crate::money::{parse_float_prefix, Currency, Money};
use serde::{Deserialize, Serialize};

/// Anything with a unit price and a count.
pub trait PricedLine {
    fn unit_price(&self) -> Money;
    fn count(&self) -> u64;

    fn line_total(&self) -> Money {
        self.unit_price().times(self.count())
    }
}

impl PricedLine for CartLineItem {
    fn unit_price(&self) -> Money {
        self.unit_price
    }

    fn count(&self) -> u64 {
        u64::from(self.quantity)
    }
}

impl<T: PricedLine> PricedLine for &T {
    fn unit_price(&self) -> Money {
        (**self).unit_price()
    }

    fn count(&self) -> u64 {
        (**self).count()
    }
}

/// A line whose price and count are still raw form text.
///
/// Unparseable or negative values count as zero; a fractional count is
/// truncated.
#[derive(Debug, Clone, Copy)]
pub struct FormLine<'a> {
    pub price: &'a str,
    pub count: &'a str,
}

impl PricedLine for FormLine<'_> {
    fn unit_price(&self) -> Money {
        Money::parse_lenient(self.price).non_negative()
    }

    fn count(&self) -> u64 {
        match parse_float_prefix(self.count) {
            // `as` truncates toward zero and saturates.
            Some(count) if count > 0.0 => count as u64,
            _ => 0,
        }
    }
}

/// Sum of `price × count` over the lines. Negative prices count as zero.
pub fn subtotal<I>(items: I) -> Money
where
    I: IntoIterator,
    I::Item: PricedLine,
{
    items
        .into_iter()
        .map(|line| line.unit_price().non_negative().times(line.count()))
        .sum()
}

/// Amounts shown on the checkout screen and sent with an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost, never negative.
    pub shipping: Money,
    /// Discount, never negative.
    pub discount: Money,
    /// `max(0, subtotal + shipping - discount)`.
    pub total: Money,
}

impl OrderTotals {
    /// Compute totals for `items`. Negative shipping or discount is treated
    /// as zero, and a discount larger than everything else floors the total
    /// at zero.
    pub fn compute<I>(items: I, shipping: Money, discount: Money) -> Self
    where
        I: IntoIterator,
        I::Item: PricedLine,
    {
        Self::from_subtotal(subtotal(items), shipping, discount)
    }

    /// Compute totals with shipping and discount taken from form text.
    pub fn from_form<I>(items: I, shipping: &str, discount: &str) -> Self
    where
        I: IntoIterator,
        I::Item: PricedLine,
    {
        Self::compute(
            items,
            Money::parse_lenient(shipping),
            Money::parse_lenient(discount),
        )
    }

    /// Compute totals from an already-known subtotal.
    pub fn from_subtotal(subtotal: Money, shipping: Money, discount: Money) -> Self {
        let subtotal = subtotal.non_negative();
        let shipping = shipping.non_negative();
        let discount = discount.non_negative();
        let total = (subtotal + shipping - discount).non_negative();
        Self {
            subtotal,
            shipping,
            discount,
            total,
        }
    }

    /// Check if a discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Render every amount in `currency`.
    pub fn format(&self, currency: Currency) -> FormattedTotals {
        FormattedTotals {
            subtotal: currency.format(self.subtotal),
            shipping: currency.format(self.shipping),
            discount: self
                .has_discount()
                .then(|| format!("-{}", currency.format(self.discount))),
            total: currency.format(self.total),
        }
    }
}

/// Display strings for [`OrderTotals`]. The discount row is only present
/// when a discount applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub shipping: String,
    pub discount: Option<String>,
    pub total: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::NewLineItem;

    fn line(price_cents: i64, quantity: u32) -> CartLineItem {
        NewLineItem::new("P", "Item", Money::new(price_cents)).with_quantity(quantity)
    }

    #[test]
    fn test_subtotal() {
        let items = vec![line(1000, 2), line(500, 1)];
        assert_eq!(subtotal(&items), Money::new(2500));
        assert_eq!(subtotal(Vec::<CartLineItem>::new()), Money::zero());
    }

    #[test]
    fn test_total_adds_shipping_and_subtracts_discount() {
        let items = vec![line(5000, 1)];
        let totals = OrderTotals::compute(&items, Money::new(1000), Money::new(500));
        assert_eq!(totals.subtotal, Money::new(5000));
        assert_eq!(totals.total, Money::new(5500));
    }

    #[test]
    fn test_total_floors_at_zero() {
        let items = vec![line(5000, 1)];
        let totals = OrderTotals::compute(&items, Money::new(1000), Money::new(10000));
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_total_never_negative() {
        for subtotal_cents in [0, 1, 999, 5000] {
            for shipping_cents in [0, 250, 1000] {
                for discount_cents in [0, 1, 5000, 1_000_000] {
                    let totals = OrderTotals::from_subtotal(
                        Money::new(subtotal_cents),
                        Money::new(shipping_cents),
                        Money::new(discount_cents),
                    );
                    let expected = (subtotal_cents + shipping_cents - discount_cents).max(0);
                    assert_eq!(totals.total, Money::new(expected));
                }
            }
        }
    }

    #[test]
    fn test_form_text_is_coerced() {
        let items = vec![line(1000, 1)];
        let totals = OrderTotals::from_form(&items, "abc", "");
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.total, Money::new(1000));

        let totals = OrderTotals::from_form(&items, "2.5", "-7");
        assert_eq!(totals.shipping, Money::new(250));
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.total, Money::new(1250));
    }

    #[test]
    fn test_form_lines() {
        let lines = [
            FormLine { price: "10", count: "2" },
            FormLine { price: "", count: "3" },
            FormLine { price: "4.5", count: "x" },
            FormLine { price: "3", count: "1.9" },
            FormLine { price: "-8", count: "1" },
        ];
        assert_eq!(subtotal(lines), Money::new(2300));
    }

    #[test]
    fn test_format() {
        let totals = OrderTotals::from_subtotal(Money::new(5000), Money::new(1000), Money::zero());
        let shown = totals.format(Currency::JOD);
        assert_eq!(shown.subtotal, "JOD50.00");
        assert_eq!(shown.shipping, "JOD10.00");
        assert_eq!(shown.discount, None);
        assert_eq!(shown.total, "JOD60.00");

        let totals = OrderTotals::from_subtotal(Money::new(5000), Money::zero(), Money::new(750));
        assert_eq!(totals.format(Currency::USD).discount.as_deref(), Some("-$ 7.50"));
    }
}
