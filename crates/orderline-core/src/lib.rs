//! # orderline-core: Pure Business Logic for the Order Engine
//!
//! Everything the order lifecycle needs to decide, with zero I/O.
//! The storage layer persists what this crate computes; the engine
//! crate wires the two together inside transactions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderline Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Request layer (external)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              orderline-engine (OrderService)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orderline-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │  │  types  │ │  money  │ │ lifecycle │ │ pricing │ │inventory│ │   │
//! │  │  │ Order   │ │  Money  │ │ table of  │ │ snapshot│ │ stock   │ │   │
//! │  │  │ Product │ │         │ │ statuses  │ │ totals  │ │ plans   │ │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                orderline-db (SQLite stores)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderItem, OrderStatus)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`lifecycle`] - The order status transition table
//! - [`pricing`] - Unit price snapshots and line/order totals
//! - [`inventory`] - Stock adjustment batches derived from transitions
//! - [`validation`] - Order creation request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use orderline_core::lifecycle::{transition, StockEffect, Transition};
//! use orderline_core::OrderStatus;
//!
//! let step = transition(OrderStatus::Pending, OrderStatus::Confirmed).unwrap();
//! assert!(matches!(
//!     step,
//!     Transition::Apply { effect: StockEffect::Reserve, .. }
//! ));
//!
//! // Terminal states have no way out
//! assert!(transition(OrderStatus::Delivered, OrderStatus::Cancelled).is_err());
//!
//! // Same status is a no-op
//! assert_eq!(
//!     transition(OrderStatus::Shipped, OrderStatus::Shipped).unwrap(),
//!     Transition::Unchanged
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
