//! # Order Service
//!
//! The six order operations: create, get, list, list by customer email,
//! change status and cancel.
//!
//! ## Status Change
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 change_order_status(id, CONFIRMED)                      │
//! │                                                                         │
//! │  load order (pool)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lifecycle::transition(PENDING, CONFIRMED) ──► Reserve                 │
//! │       │                                   (Unchanged? return order)    │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    UPDATE orders SET status WHERE status = 'pending'                   │
//! │       │  0 rows: someone else moved it ──► re-read, consult table again│
//! │       ▼                                                                 │
//! │    apply_adjustments([-3 P1, -1 P2])                                   │
//! │       │  short? ──► InsufficientStock, ROLLBACK (nothing changed)      │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transaction starts with a write, so SQLite hands out the writer
//! lock up front and concurrent callers queue on `busy_timeout` instead of
//! failing on a stale read snapshot.

use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, warn};

use orderline_core::inventory::plan_for;
use orderline_core::lifecycle::{transition, Transition};
use orderline_core::pricing::OrderQuote;
use orderline_core::validation::validate_create_request;
use orderline_core::{
    CoreError, CreateOrderRequest, NewOrder, Order, OrderStatus, ValidationError,
};
use orderline_db::{Database, DbError, OrderRepository};

use crate::config::EngineConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::inventory::apply_adjustments;

/// Attempts allowed when another caller moves an order between our read and
/// our compare-and-set. An order makes at most three moves in its life.
const MAX_STATUS_ATTEMPTS: usize = 5;

/// Order lifecycle engine over a [`Database`].
///
/// Cheap to clone; clones share the connection pool and can be moved into
/// concurrent tasks.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    /// Opens (and migrates) the database described by `config`.
    pub async fn connect(config: &EngineConfig) -> ServiceResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(OrderService::new(db))
    }

    /// The underlying database, for catalog maintenance.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Validates the request, prices every line and persists a `Pending`
    /// order.
    ///
    /// Creation only checks that each product has *some* stock; quantities
    /// are checked against live stock when the order is confirmed. No stock
    /// is reserved here.
    ///
    /// ## Errors
    /// * `Validation` - blank name/email, no items, missing id or quantity,
    ///   non-positive quantity
    /// * `ProductNotFound` - unknown product id
    /// * `InsufficientStock` - a product with no stock at all
    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        info!(customer_email = %request.customer_email, "Creating order");

        let validated = validate_create_request(&request).map_err(|err| {
            log_rejected_request(&request, &err);
            CoreError::Validation(err)
        })?;

        let mut quote = OrderQuote::new();

        for line in &validated.lines {
            let product = self
                .db
                .products()
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            if !product.has_stock() {
                warn!(product_id = %product.id, "Insufficient stock for product");
                return Err(CoreError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: line.quantity,
                }
                .into());
            }

            let priced = quote.add_line(&product, line.quantity)?;
            debug!(
                product = %priced.product_name,
                quantity = priced.quantity,
                unit_price = %priced.unit_price,
                "Adding product to order"
            );
        }

        let new_order = NewOrder::new(validated.customer_name, validated.customer_email, quote);

        let mut tx = self.begin().await?;
        let order = OrderRepository::insert(&mut tx, &new_order).await?;
        commit(tx).await?;

        info!(
            order_id = %order.id,
            total = %order.total_amount(),
            "Order created successfully"
        );
        Ok(order)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetches an order with its items.
    pub async fn get_order(&self, id: &str) -> ServiceResult<Order> {
        self.db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()).into())
    }

    /// Every order, oldest first.
    pub async fn list_orders(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_all().await?)
    }

    /// Orders placed with `email` (exact match after trimming), oldest first.
    pub async fn list_orders_by_customer_email(&self, email: &str) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_by_customer_email(email.trim()).await?)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Moves an order to `target`, applying the transition's stock effect.
    ///
    /// Requesting the current status is a no-op that returns the order as is.
    ///
    /// ## Errors
    /// * `OrderNotFound` - unknown order id
    /// * `InvalidTransition` - move not in the transition table
    /// * `InsufficientStock` - confirmation with a short line (nothing changed)
    /// * `ProductNotFound` - a line's product row is gone
    /// * `ConcurrentModification` - the order kept moving for every re-read
    ///
    /// When another caller moves the order first, the request is decided
    /// again against the order's new status: a cancel that loses to a
    /// confirmation still cancels (and restocks), a confirmation that loses
    /// to a cancel fails with `InvalidTransition`.
    pub async fn change_order_status(
        &self,
        id: &str,
        target: OrderStatus,
    ) -> ServiceResult<Order> {
        for attempt in 1..=MAX_STATUS_ATTEMPTS {
            let order = self.get_order(id).await?;

            let (from, to, effect) = match transition(order.status, target) {
                Ok(Transition::Unchanged) => {
                    debug!(order_id = %id, status = %target, "Order already in requested status");
                    return Ok(order);
                }
                Ok(Transition::Apply { from, to, effect }) => (from, to, effect),
                Err(err) => {
                    warn!(
                        order_id = %id,
                        from = %order.status,
                        to = %target,
                        allowed = ?order.status.allowed_targets(),
                        "Rejected status change"
                    );
                    return Err(err.into());
                }
            };

            let mut tx = self.begin().await?;

            if !OrderRepository::compare_and_set_status(&mut tx, id, from, to).await? {
                tx.rollback().await.map_err(DbError::transaction)?;
                debug!(order_id = %id, attempt, "Order moved before our write, re-reading");
                continue;
            }

            let adjustments = plan_for(&order.items, effect);
            apply_adjustments(&mut tx, &adjustments).await?;
            commit(tx).await?;

            info!(
                order_id = %id,
                from = %from,
                to = %to,
                adjustments = adjustments.len(),
                "Order status changed"
            );

            return self.get_order(id).await;
        }

        warn!(order_id = %id, wanted = %target, "Order kept moving under concurrent updates");
        Err(ServiceError::ConcurrentModification {
            order_id: id.to_string(),
        })
    }

    /// Cancels an order, restoring stock if it had been confirmed.
    ///
    /// Follows the same table as [`change_order_status`](Self::change_order_status):
    /// cancelling a cancelled order is a no-op, cancelling a shipped or
    /// delivered one is an `InvalidTransition`.
    pub async fn cancel_order(&self, id: &str) -> ServiceResult<()> {
        info!(order_id = %id, "Cancelling order");
        self.change_order_status(id, OrderStatus::Cancelled).await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn begin(&self) -> ServiceResult<Transaction<'static, Sqlite>> {
        Ok(self.db.begin().await?)
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> ServiceResult<()> {
    tx.commit().await.map_err(DbError::transaction)?;
    Ok(())
}

fn log_rejected_request(request: &CreateOrderRequest, err: &ValidationError) {
    match err {
        ValidationError::Empty { .. } => {
            warn!(customer_email = %request.customer_email, "Attempt to create empty order")
        }
        ValidationError::Required { field } if field.starts_with("customer") => {
            warn!(
                customer_name = %request.customer_name,
                customer_email = %request.customer_email,
                "Invalid customer info"
            )
        }
        other => warn!(error = %other, "Invalid order request"),
    }
}
