//! # orderline-engine: Order Lifecycle Engine
//!
//! Creates orders, moves them through their lifecycle and keeps product
//! stock in step, safely under concurrent callers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Request layer (HTTP, CLI, ...)                                        │
//! │       │  CreateOrderRequest / (id, OrderStatus)                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               orderline-engine (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   OrderService ──► inventory::apply_adjustments                 │   │
//! │  │        │                     │                                  │   │
//! │  │   ServiceError / ErrorCode   │  one transaction per operation   │   │
//! │  └────────┼─────────────────────┼──────────────────────────────────┘   │
//! │           ▼                     ▼                                       │
//! │    orderline-core          orderline-db                                 │
//! │    (rules, pricing)        (SQLite stores)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderline_engine::{init_tracing, EngineConfig, OrderService};
//! use orderline_core::{CreateOrderRequest, OrderItemRequest, OrderStatus};
//!
//! let config = EngineConfig::from_env()?;
//! init_tracing(&config.log_filter);
//!
//! let service = OrderService::connect(&config).await?;
//! let order = service
//!     .create_order(CreateOrderRequest::new(
//!         "Ada",
//!         "ada@example.com",
//!         vec![OrderItemRequest::new(product_id, 3)],
//!     ))
//!     .await?;
//!
//! service.change_order_status(&order.id, OrderStatus::Confirmed).await?;
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod service;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use error::{ErrorCode, ErrorPayload, ServiceError, ServiceResult};
pub use service::OrderService;
pub use telemetry::init_tracing;
