//! # Inventory Adjustment Plans
//!
//! Turns a transition's [`StockEffect`] into the ordered batch of per-product
//! adjustments the store must apply atomically.
//!
//! ```text
//! CONFIRMED order, items [(P1, 3), (P2, 1)]
//!      │
//!      │ StockEffect::Restore
//!      ▼
//! [ +3 P1, +1 P2 ]   (one entry per line, line order)
//! ```
//!
//! Applying the batch is the storage layer's job; it must make every
//! decrement a single conditional write so the check and the mutation cannot
//! interleave with another caller.

use serde::Serialize;

use crate::lifecycle::StockEffect;
use crate::types::OrderItem;

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `stock -= quantity`, only if `stock >= quantity`.
    Decrement,
    /// `stock += quantity`, unconditionally.
    Increment,
}

/// A single product stock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
    pub product_id: String,
    pub quantity: i64,
    pub direction: Direction,
}

impl StockAdjustment {
    pub fn decrement(product_id: impl Into<String>, quantity: i64) -> Self {
        StockAdjustment {
            product_id: product_id.into(),
            quantity,
            direction: Direction::Decrement,
        }
    }

    pub fn increment(product_id: impl Into<String>, quantity: i64) -> Self {
        StockAdjustment {
            product_id: product_id.into(),
            quantity,
            direction: Direction::Increment,
        }
    }

    /// Signed change to apply to the product's stock.
    pub fn delta(&self) -> i64 {
        match self.direction {
            Direction::Decrement => -self.quantity,
            Direction::Increment => self.quantity,
        }
    }
}

/// Builds the adjustment batch for an order's items.
///
/// Returns an empty batch for [`StockEffect::None`].
pub fn plan_for(items: &[OrderItem], effect: StockEffect) -> Vec<StockAdjustment> {
    let direction = match effect {
        StockEffect::None => return Vec::new(),
        StockEffect::Reserve => Direction::Decrement,
        StockEffect::Restore => Direction::Increment,
    };

    items
        .iter()
        .map(|item| StockAdjustment {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            direction,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(product_id: &str, quantity: i64) -> OrderItem {
        OrderItem {
            id: format!("item-{}", product_id),
            order_id: "o".to_string(),
            product_id: product_id.to_string(),
            product_name: product_id.to_uppercase(),
            quantity,
            unit_price_cents: 100,
            total_price_cents: 100 * quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reserve_plans_decrements_in_line_order() {
        let items = [item("p1", 3), item("p2", 1)];
        let plan = plan_for(&items, StockEffect::Reserve);
        assert_eq!(
            plan,
            vec![
                StockAdjustment::decrement("p1", 3),
                StockAdjustment::decrement("p2", 1),
            ]
        );
        assert_eq!(plan[0].delta(), -3);
    }

    #[test]
    fn test_restore_plans_increments() {
        let plan = plan_for(&[item("p1", 4)], StockEffect::Restore);
        assert_eq!(plan, vec![StockAdjustment::increment("p1", 4)]);
        assert_eq!(plan[0].delta(), 4);
    }

    #[test]
    fn test_no_effect_plans_nothing() {
        assert!(plan_for(&[item("p1", 4)], StockEffect::None).is_empty());
    }

    #[test]
    fn test_duplicate_products_keep_one_entry_per_line() {
        let plan = plan_for(&[item("p1", 2), item("p1", 2)], StockEffect::Reserve);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.iter().map(|a| a.quantity).sum::<i64>(), 4);
    }
}
