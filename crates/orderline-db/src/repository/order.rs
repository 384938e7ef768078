//! # Order Repository
//!
//! Persists orders together with their line items.
//!
//! ## Write Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       What Can Change                                   │
//! │                                                                         │
//! │  insert ─────► orders row + every order_items row (one transaction)    │
//! │                                                                         │
//! │  compare_and_set_status                                                │
//! │     UPDATE orders SET status = 'confirmed'                             │
//! │     WHERE id = ? AND status = 'pending'    ← loses cleanly on a race   │
//! │                                                                         │
//! │  Nothing else: totals and lines are frozen once inserted, and orders   │
//! │  are never deleted.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use orderline_core::{NewOrder, Order, OrderItem, OrderStatus};

/// Row shape of the `orders` table; items are loaded separately.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    total_amount_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            status: self.status,
            total_amount_cents: self.total_amount_cents,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const ORDER_COLUMNS: &str = r#"
    id, customer_name, customer_email, status, total_amount_cents,
    created_at, updated_at
"#;

const ITEM_COLUMNS: &str = r#"
    id, order_id, product_id, product_name, quantity,
    unit_price_cents, total_price_cents, created_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its items, in line order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY line_no",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(row.into_order(items)))
    }

    /// Lists every order, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY created_at, rowid",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM order_items ORDER BY order_id, line_no",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(assemble(rows, items))
    }

    /// Lists the orders placed with exactly this email, oldest first.
    pub async fn list_by_customer_email(&self, email: &str) -> DbResult<Vec<Order>> {
        debug!(email = %email, "Listing orders by customer email");

        let sql = format!(
            "SELECT {} FROM orders WHERE customer_email = ?1 ORDER BY created_at, rowid",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT {} FROM order_items
            WHERE order_id IN (SELECT id FROM orders WHERE customer_email = ?1)
            ORDER BY order_id, line_no
            "#,
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        Ok(assemble(rows, items))
    }

    /// Counts orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional writes
    // =========================================================================

    /// Inserts a new `Pending` order and all of its lines.
    ///
    /// Ids and timestamps are assigned here. Run it inside a transaction so
    /// the order and its items land together or not at all.
    pub async fn insert(conn: &mut SqliteConnection, new_order: &NewOrder) -> DbResult<Order> {
        let order_id = generate_order_id();
        let now = Utc::now();

        debug!(
            order_id = %order_id,
            lines = new_order.lines.len(),
            "Inserting order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, customer_name, customer_email, status, total_amount_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&order_id)
        .bind(&new_order.customer_name)
        .bind(&new_order.customer_email)
        .bind(OrderStatus::Pending)
        .bind(new_order.total_amount.cents())
        .bind(now)
        .execute(&mut *conn)
        .await?;

        let mut items = Vec::with_capacity(new_order.lines.len());

        for (line_no, line) in new_order.lines.iter().enumerate() {
            let item = OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
                total_price_cents: line.total_price.cents(),
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, line_no, product_id, product_name, quantity,
                    unit_price_cents, total_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(line_no as i64)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(item.created_at)
            .execute(&mut *conn)
            .await?;

            items.push(item);
        }

        Ok(Order {
            id: order_id,
            customer_name: new_order.customer_name.clone(),
            customer_email: new_order.customer_email.clone(),
            status: OrderStatus::Pending,
            total_amount_cents: new_order.total_amount.cents(),
            items,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves an order from `expected` to `next` if it is still in `expected`.
    ///
    /// ## Returns
    /// * `Ok(true)` - Status written
    /// * `Ok(false)` - The order is gone or no longer in `expected`
    pub async fn compare_and_set_status(
        conn: &mut SqliteConnection,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> DbResult<bool> {
        debug!(order_id = %id, from = %expected, to = %next, "Updating order status");

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Attaches items to their orders, keeping the order of `rows`.
fn assemble(rows: Vec<OrderRow>, items: Vec<OrderItem>) -> Vec<Order> {
    let mut by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }

    rows.into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect()
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use orderline_core::pricing::OrderQuote;
    use orderline_core::Product;

    fn product(name: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_cents,
            stock: 10,
            category: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn new_order(email: &str, lines: &[(&Product, i64)]) -> NewOrder {
        let mut quote = OrderQuote::new();
        for (p, qty) in lines {
            quote.add_line(p, *qty).unwrap();
        }
        NewOrder::new("Ada", email, quote)
    }

    async fn insert(db: &Database, order: &NewOrder) -> Order {
        let mut tx = db.begin().await.unwrap();
        let created = OrderRepository::insert(&mut tx, order).await.unwrap();
        tx.commit().await.unwrap();
        created
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product("A", 200);
        let b = product("B", 1999);

        let created = insert(&db, &new_order("ada@example.com", &[(&a, 3), (&b, 1), (&a, 1)])).await;
        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.total_amount_cents, 600 + 1999 + 200);
        assert!(created.is_consistent());

        let loaded = db.orders().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 3);
        // Line order is preserved
        let quantities: Vec<i64> = loaded.items.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![3, 1, 1]);
        assert_eq!(loaded.items[1].product_name, "B");
        assert!(loaded.is_consistent());
        assert_eq!(loaded.id, created.id);

        assert!(db.orders().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_items_survive_product_removal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        // The product row never exists: order lines only reference it by id
        let ghost = product("Ghost", 500);

        let created = insert(&db, &new_order("ada@example.com", &[(&ghost, 2)])).await;
        let loaded = db.orders().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.items[0].product_id, ghost.id);
        assert_eq!(loaded.total_amount_cents, 1000);
    }

    #[tokio::test]
    async fn test_uncommitted_insert_leaves_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product("A", 200);

        {
            let mut tx = db.begin().await.unwrap();
            OrderRepository::insert(&mut tx, &new_order("ada@example.com", &[(&a, 1)]))
                .await
                .unwrap();
        }

        assert_eq!(db.orders().count().await.unwrap(), 0);
        let stray: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(stray, 0);
    }

    #[tokio::test]
    async fn test_lists_filter_and_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product("A", 100);

        let first = insert(&db, &new_order("ada@example.com", &[(&a, 1)])).await;
        let other = insert(&db, &new_order("bob@example.com", &[(&a, 2)])).await;
        let second = insert(&db, &new_order("ada@example.com", &[(&a, 3)])).await;

        let all = db.orders().list_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), other.id.as_str(), second.id.as_str()]);
        assert!(all.iter().all(|o| o.items.len() == 1));

        let ada = db.orders().list_by_customer_email("ada@example.com").await.unwrap();
        assert_eq!(ada.len(), 2);
        assert_eq!(ada[0].id, first.id);
        assert_eq!(ada[1].items[0].quantity, 3);

        assert!(db
            .orders()
            .list_by_customer_email("nobody@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_compare_and_set_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = product("A", 100);
        let order = insert(&db, &new_order("ada@example.com", &[(&a, 1)])).await;

        let mut conn = db.pool().acquire().await.unwrap();
        assert!(OrderRepository::compare_and_set_status(
            &mut conn,
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Confirmed
        )
        .await
        .unwrap());

        // Stale expectation loses
        assert!(!OrderRepository::compare_and_set_status(
            &mut conn,
            &order.id,
            OrderStatus::Pending,
            OrderStatus::Cancelled
        )
        .await
        .unwrap());
        drop(conn);

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Confirmed);
        assert!(loaded.updated_at >= loaded.created_at);
    }
}
