//! # Domain Types
//!
//! Core domain types used throughout the order engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   owns    ┌─────────────────┐   refs   ┌────────┐ │
//! │  │     Order       │──────────►│   OrderItem     │ ───id───►│Product │ │
//! │  │  ─────────────  │  1 .. n   │  ─────────────  │          │ stock  │ │
//! │  │  id             │           │  product_id     │          │ price  │ │
//! │  │  status         │           │  quantity       │          └────────┘ │
//! │  │  total_amount   │           │  unit_price     │ (snapshot)          │
//! │  │  items          │           │  total_price    │                     │
//! │  └─────────────────┘           └─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! An `Order` exclusively owns its items: they are created with it and never
//! outlive it. Products are referenced by id only and loaded explicitly by the
//! store when needed; a reference may dangle once a product is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::{OrderQuote, PricedLine};

// =============================================================================
// Product
// =============================================================================

/// A catalog entry with a live stock count.
///
/// The engine reads `price_cents` once, at order creation, and only ever
/// mutates `stock` through the conditional stock primitives of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4), assigned by the store.
    pub id: String,

    /// Display name, snapshotted onto order lines.
    pub name: String,

    /// Live price in cents.
    pub price_cents: i64,

    /// Units currently available for confirmation. Never negative.
    pub stock: i64,

    /// Optional catalog category.
    pub category: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the live price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Presence check used at order creation: any stock at all.
    #[inline]
    pub fn has_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// ```text
///            ┌──────────► CANCELLED ◄──────────┐
///            │                                 │ (restock)
///  PENDING ──┴──► CONFIRMED ──► SHIPPED ──► DELIVERED
///        (reserve stock)
/// ```
///
/// Allowed moves live in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, stock not yet committed.
    Pending,
    /// Stock has been decremented for every line.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Terminal: received by the customer.
    Delivered,
    /// Terminal: will never progress.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Canonical upper-case name, as used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status name case-insensitively (`"confirmed"`, `"CONFIRMED"`).
impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{}'", wanted),
            })
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order.
/// Uses the snapshot pattern to freeze product data at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    /// Owning order.
    pub order_id: String,
    /// Referenced product; may dangle if the product is later removed.
    pub product_id: String,
    /// Product name at creation time (frozen).
    pub product_name: String,
    /// Ordered units, always positive.
    pub quantity: i64,
    /// Unit price in cents at creation time (frozen).
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents`.
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer's order with its owned line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    /// Σ `items[i].total_price_cents`, fixed at creation.
    pub total_amount_cents: i64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Sum of the line totals.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    /// Checks `total_amount == Σ item.total_price` and
    /// `item.total_price == item.unit_price × item.quantity` for every line.
    pub fn is_consistent(&self) -> bool {
        let lines_ok = self.items.iter().all(|item| {
            item.unit_price().checked_mul_quantity(item.quantity) == Some(item.total_price())
        });
        lines_ok && self.items_total() == self.total_amount()
    }
}

/// A validated, priced order about to be persisted.
///
/// The store assigns ids and timestamps and always inserts it as `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<PricedLine>,
    pub total_amount: Money,
}

impl NewOrder {
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        quote: OrderQuote,
    ) -> Self {
        let total_amount = quote.total();
        NewOrder {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            lines: quote.into_lines(),
            total_amount,
        }
    }
}

// =============================================================================
// Creation Request
// =============================================================================

/// Order creation input as handed over by the request layer.
///
/// Item fields are optional so a missing `productId`/`quantity` in the
/// incoming body reaches validation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

/// One requested line: product id and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

impl OrderItemRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        OrderItemRequest {
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }
}

impl CreateOrderRequest {
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        items: Vec<OrderItemRequest>,
    ) -> Self {
        CreateOrderRequest {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            items,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
