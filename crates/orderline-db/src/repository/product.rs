//! # Product Repository
//!
//! Database operations for products and their stock counts.
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, compare, write back                                   │
//! │     SELECT stock ...            (both callers read 5)                  │
//! │     UPDATE products SET stock = 2                                      │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional delta                                     │
//! │     UPDATE products SET stock = stock - 3                              │
//! │     WHERE id = ? AND stock >= 3                                        │
//! │                                                                         │
//! │  Caller A: 5 → 2, 1 row affected                                       │
//! │  Caller B: 2 < 3, 0 rows affected → insufficient stock                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock primitives take a connection rather than `&self` so they run
//! inside the caller's transaction.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use orderline_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    id, name, price_cents, stock, category, is_active,
    created_at, updated_at, deleted_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let left = repo.stock_of("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// Inactive products are returned too: an order may still reference them.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    /// * `Err(DbError::CheckViolation)` - Negative price or stock
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price_cents, stock, category, is_active,
                created_at, updated_at, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.id),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Writes every field of an existing product back.
    ///
    /// For catalog maintenance only. Order flows must move stock through
    /// [`try_decrement_stock`](Self::try_decrement_stock) and
    /// [`increment_stock`](Self::increment_stock).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn save(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Saving product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                stock = ?4,
                category = ?5,
                is_active = ?6,
                updated_at = ?7,
                deleted_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(Utc::now())
        .bind(product.deleted_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product: `is_active = 0` and `deleted_at` stamped.
    ///
    /// Existing order lines keep their snapshot and still point at the row.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, deleted_at = ?2, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Current stock, or `None` if the product doesn't exist.
    pub async fn stock_of(&self, id: &str) -> DbResult<Option<i64>> {
        let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stock)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional stock primitives
    // =========================================================================

    /// Decrements stock by `quantity` only if at least `quantity` is available.
    ///
    /// Check and write are a single statement, so no other writer can slip in
    /// between them.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock decremented
    /// * `Ok(false)` - Not enough stock, or no such product (nothing written)
    pub async fn try_decrement_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Adds `quantity` back to a product's stock.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock incremented
    /// * `Ok(false)` - No such product
    pub async fn increment_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity, "Incrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Stock as seen by the given connection (inside its transaction).
    pub async fn stock_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<i64>> {
        let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(stock)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn product(name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            price_cents,
            stock,
            category: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    async fn db_with(p: &Product) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products().insert(p).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let widget = product("Widget", 200, 10);
        let db = db_with(&widget).await;

        let loaded = db.products().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Widget");
        assert_eq!(loaded.price_cents, 200);
        assert_eq!(loaded.stock, 10);
        assert!(loaded.is_active);

        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let widget = product("Widget", 200, 10);
        let db = db_with(&widget).await;

        let err = db.products().insert(&widget).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_negative_stock_is_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .products()
            .insert(&product("Broken", 100, -1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_conditional_decrement() {
        let widget = product("Widget", 200, 5);
        let db = db_with(&widget).await;
        let mut conn = db.pool().acquire().await.unwrap();

        assert!(ProductRepository::try_decrement_stock(&mut conn, &widget.id, 3)
            .await
            .unwrap());
        // 2 left, 3 requested: refused and untouched
        assert!(!ProductRepository::try_decrement_stock(&mut conn, &widget.id, 3)
            .await
            .unwrap());
        assert_eq!(
            ProductRepository::stock_in(&mut conn, &widget.id).await.unwrap(),
            Some(2)
        );

        // Exactly the remaining amount is allowed
        assert!(ProductRepository::try_decrement_stock(&mut conn, &widget.id, 2)
            .await
            .unwrap());
        drop(conn);
        assert_eq!(db.products().stock_of(&widget.id).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_stock_primitives_on_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        assert!(!ProductRepository::try_decrement_stock(&mut conn, "nope", 1)
            .await
            .unwrap());
        assert!(!ProductRepository::increment_stock(&mut conn, "nope", 1)
            .await
            .unwrap());
        assert_eq!(ProductRepository::stock_in(&mut conn, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_and_rollback() {
        let widget = product("Widget", 200, 1);
        let db = db_with(&widget).await;

        let mut tx = db.begin().await.unwrap();
        assert!(ProductRepository::increment_stock(&mut tx, &widget.id, 4)
            .await
            .unwrap());
        assert_eq!(
            ProductRepository::stock_in(&mut tx, &widget.id).await.unwrap(),
            Some(5)
        );
        tx.rollback().await.unwrap();

        assert_eq!(db.products().stock_of(&widget.id).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_save_and_soft_delete() {
        let mut widget = product("Widget", 200, 1);
        let db = db_with(&widget).await;

        widget.price_cents = 250;
        db.products().save(&widget).await.unwrap();

        db.products().soft_delete(&widget.id).await.unwrap();
        let loaded = db.products().get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_cents, 250);
        assert!(!loaded.is_active);
        assert!(loaded.deleted_at.is_some());
        assert_eq!(db.products().count().await.unwrap(), 0);

        let err = db.products().soft_delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
