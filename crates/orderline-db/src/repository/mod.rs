//! # Repository Module
//!
//! Database repository implementations for the order engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reads vs Transactional Writes                        │
//! │                                                                         │
//! │  OrderService                                                          │
//! │       │                                                                 │
//! │       ├── db.orders().get_by_id(id)        reads: &self, pooled        │
//! │       │                                                                 │
//! │       └── let mut tx = db.begin()                                      │
//! │           OrderRepository::compare_and_set_status(&mut tx, ..)         │
//! │           ProductRepository::try_decrement_stock(&mut tx, ..)          │
//! │           tx.commit()                      writes: on the tx conn      │
//! │                                                                         │
//! │  SQL stays in this module; the engine never writes a query.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products and stock
//! - [`OrderRepository`](order::OrderRepository) - Orders with their items

pub mod order;
pub mod product;
