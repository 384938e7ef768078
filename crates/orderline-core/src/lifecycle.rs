//! # Order Lifecycle
//!
//! The single transition table for order statuses. Both the general
//! status-change entry point and direct cancellation consult it, so there is
//! exactly one policy for what may happen to an order.
//!
//! ## Transition Table
//! ```text
//! ┌──────────────┬──────────────┬────────────────────────────────────────┐
//! │ From         │ To           │ Stock effect                           │
//! ├──────────────┼──────────────┼────────────────────────────────────────┤
//! │ PENDING      │ CONFIRMED    │ Reserve: check all, then decrement all │
//! │ PENDING      │ CANCELLED    │ None                                   │
//! │ CONFIRMED    │ CANCELLED    │ Restore: add every quantity back       │
//! │ CONFIRMED    │ SHIPPED      │ None                                   │
//! │ SHIPPED      │ DELIVERED    │ None                                   │
//! ├──────────────┴──────────────┴────────────────────────────────────────┤
//! │ X → X        : no-op success                                         │
//! │ anything else: InvalidTransition (incl. all moves out of DELIVERED   │
//! │                and CANCELLED)                                        │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::OrderStatus;

/// Inventory consequence of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockEffect {
    /// Status change only.
    None,
    /// Decrement every line's product by its quantity, all or nothing.
    Reserve,
    /// Add every line's quantity back to its product.
    Restore,
}

/// Outcome of validating a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals current status: nothing to do.
    Unchanged,
    /// A permitted move with its stock effect.
    Apply {
        from: OrderStatus,
        to: OrderStatus,
        effect: StockEffect,
    },
}

/// Looks up a move in the table.
///
/// The match is exhaustive over the source status, so a new status cannot be
/// added without deciding its outgoing moves here.
fn table(from: OrderStatus, to: OrderStatus) -> Option<StockEffect> {
    use OrderStatus::*;

    match from {
        Pending => match to {
            Confirmed => Some(StockEffect::Reserve),
            Cancelled => Some(StockEffect::None),
            _ => None,
        },
        Confirmed => match to {
            Cancelled => Some(StockEffect::Restore),
            Shipped => Some(StockEffect::None),
            _ => None,
        },
        Shipped => match to {
            Delivered => Some(StockEffect::None),
            _ => None,
        },
        Delivered | Cancelled => None,
    }
}

/// Validates a requested status change.
///
/// ## Returns
/// * `Ok(Transition::Unchanged)` - `from == to`, including terminal states
/// * `Ok(Transition::Apply { .. })` - permitted move
/// * `Err(CoreError::InvalidTransition)` - anything else
pub fn transition(from: OrderStatus, to: OrderStatus) -> CoreResult<Transition> {
    if from == to {
        return Ok(Transition::Unchanged);
    }

    table(from, to)
        .map(|effect| Transition::Apply { from, to, effect })
        .ok_or(CoreError::InvalidTransition { from, to })
}

impl OrderStatus {
    /// Statuses reachable in one step.
    pub fn allowed_targets(&self) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|to| table(*self, *to).is_some())
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_permitted_moves_and_effects() {
        let cases = [
            (Pending, Confirmed, StockEffect::Reserve),
            (Pending, Cancelled, StockEffect::None),
            (Confirmed, Cancelled, StockEffect::Restore),
            (Confirmed, Shipped, StockEffect::None),
            (Shipped, Delivered, StockEffect::None),
        ];

        for (from, to, effect) in cases {
            assert_eq!(
                transition(from, to).unwrap(),
                Transition::Apply { from, to, effect },
                "{from} -> {to}"
            );
        }
    }

    #[test]
    fn test_exactly_five_moves_are_permitted() {
        let permitted = OrderStatus::ALL
            .iter()
            .flat_map(|from| OrderStatus::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from != to)
            .filter(|(from, to)| transition(*from, *to).is_ok())
            .count();
        assert_eq!(permitted, 5);
    }

    #[test]
    fn test_same_status_is_unchanged() {
        for status in OrderStatus::ALL {
            assert_eq!(transition(status, status).unwrap(), Transition::Unchanged);
        }
    }

    #[test]
    fn test_rejected_moves() {
        for (from, to) in [
            (Pending, Shipped),
            (Pending, Delivered),
            (Confirmed, Pending),
            (Confirmed, Delivered),
            (Shipped, Cancelled),
            (Shipped, Pending),
            (Delivered, Cancelled),
            (Cancelled, Pending),
            (Cancelled, Confirmed),
        ] {
            assert_eq!(
                transition(from, to),
                Err(CoreError::InvalidTransition { from, to })
            );
        }
    }

    #[test]
    fn test_allowed_targets() {
        assert!(Delivered.allowed_targets().is_empty());
        assert!(Cancelled.allowed_targets().is_empty());
        assert_eq!(Shipped.allowed_targets(), vec![Delivered]);
        assert_eq!(Pending.allowed_targets(), vec![Confirmed, Cancelled]);
        assert_eq!(Confirmed.allowed_targets(), vec![Shipped, Cancelled]);
    }
}
