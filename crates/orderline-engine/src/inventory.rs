//! # Inventory Adjustment
//!
//! Applies a batch of [`StockAdjustment`]s on one transaction connection.
//!
//! ```text
//! BEGIN
//!   UPDATE orders ... status      (caller, first write)
//!   ┌── for each adjustment, in line order ─────────────────────────┐
//!   │  Decrement: UPDATE ... WHERE stock >= qty   0 rows? → error   │
//!   │  Increment: UPDATE ... stock + qty          0 rows? → error   │
//!   └───────────────────────────────────────────────────────────────┘
//! COMMIT                          (caller, only if the batch succeeded)
//! ```
//!
//! On error the caller drops the transaction, so either every adjustment of
//! the batch is visible or none is. Lines of the same product are applied
//! one after another, each checked against the stock the previous one left.

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use orderline_core::inventory::{Direction, StockAdjustment};
use orderline_core::CoreError;
use orderline_db::ProductRepository;

use crate::error::ServiceResult;

/// Applies every adjustment or reports the first one that cannot be applied.
///
/// ## Errors
/// * `InsufficientStock` - a decrement found less than its quantity;
///   `available` is the stock at that point of the batch
/// * `ProductNotFound` - the product row is gone
pub async fn apply_adjustments(
    conn: &mut SqliteConnection,
    adjustments: &[StockAdjustment],
) -> ServiceResult<()> {
    for adjustment in adjustments {
        let id = adjustment.product_id.as_str();

        let applied = match adjustment.direction {
            Direction::Decrement => {
                ProductRepository::try_decrement_stock(conn, id, adjustment.quantity).await?
            }
            Direction::Increment => {
                ProductRepository::increment_stock(conn, id, adjustment.quantity).await?
            }
        };

        if !applied {
            return Err(rejection(conn, adjustment).await?.into());
        }

        debug!(product_id = %id, delta = adjustment.delta(), "Stock adjusted");
    }

    Ok(())
}

/// Explains why an adjustment wrote nothing.
async fn rejection(
    conn: &mut SqliteConnection,
    adjustment: &StockAdjustment,
) -> ServiceResult<CoreError> {
    let id = &adjustment.product_id;

    match ProductRepository::stock_in(conn, id).await? {
        None => {
            warn!(product_id = %id, "Product referenced by order no longer exists");
            Ok(CoreError::ProductNotFound(id.clone()))
        }
        Some(available) => {
            warn!(
                product_id = %id,
                available,
                requested = adjustment.quantity,
                "Insufficient stock"
            );
            Ok(CoreError::InsufficientStock {
                product_id: id.clone(),
                available,
                requested: adjustment.quantity,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
