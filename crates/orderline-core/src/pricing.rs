//! # Pricing
//!
//! Snapshots unit prices and computes line and order totals at creation time.
//!
//! ```text
//! Product (live price 2.00) ──snapshot──► PricedLine { unit 2.00, qty 3, total 6.00 }
//!                                                  │
//!                                                  ▼
//!                                   OrderQuote.total += 6.00
//! ```
//!
//! Once quoted, a line's prices never change, even if the product is repriced.

use serde::Serialize;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;

/// One priced line, ready to be persisted as an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

/// Priced lines of an order and their running total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    lines: Vec<PricedLine>,
    total: Money,
}

/// Prices `quantity` units of `product` at its current price.
///
/// ## Errors
/// `Validation(OutOfRange)` if `unit_price × quantity` overflows.
pub fn price_line(product: &Product, quantity: i64) -> CoreResult<PricedLine> {
    let unit_price = product.price();
    let total_price = unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| overflow("line total"))?;

    Ok(PricedLine {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        unit_price,
        total_price,
    })
}

impl OrderQuote {
    pub fn new() -> Self {
        OrderQuote::default()
    }

    /// Prices a line and adds it to the running total.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<&PricedLine> {
        let line = price_line(product, quantity)?;
        self.total = self
            .total
            .checked_add(line.total_price)
            .ok_or_else(|| overflow("order total"))?;
        self.lines.push(line);
        Ok(&self.lines[self.lines.len() - 1])
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn into_lines(self) -> Vec<PricedLine> {
        self.lines
    }
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::Utc;

    fn product(id: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            stock: 10,
            category: Some("tools".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_price_line_snapshots_price() {
        let mut p = product("a", 200);
        let line = price_line(&p, 3).unwrap();
        assert_eq!(line.unit_price, Money::from_cents(200));
        assert_eq!(line.total_price, Money::from_cents(600));
        assert_eq!(line.product_name, "Product a");

        // Repricing the product afterwards does not touch the line
        p.price_cents = 999;
        assert_eq!(line.total_price.to_string(), "6.00");
    }

    #[test]
    fn test_quote_total_is_sum_of_lines() {
        let mut quote = OrderQuote::new();
        quote.add_line(&product("a", 200), 3).unwrap();
        quote.add_line(&product("b", 1999), 2).unwrap();
        quote.add_line(&product("a", 200), 1).unwrap();

        assert_eq!(quote.lines().len(), 3);
        assert_eq!(quote.total(), Money::from_cents(600 + 3998 + 200));
        let summed: Money = quote.lines().iter().map(|l| l.total_price).sum();
        assert_eq!(summed, quote.total());
    }

    #[test]
    fn test_free_product_prices_to_zero() {
        let line = price_line(&product("gift", 0), 5).unwrap();
        assert!(line.total_price.is_zero());
    }

    #[test]
    fn test_overflow_is_validation_error() {
        let err = price_line(&product("x", i64::MAX), 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        let mut quote = OrderQuote::new();
        quote.add_line(&product("x", i64::MAX), 1).unwrap();
        assert!(quote.add_line(&product("y", 1), 1).is_err());
        assert_eq!(quote.lines().len(), 1);
    }
}
