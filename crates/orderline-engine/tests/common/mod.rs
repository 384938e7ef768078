//! Shared fixtures for the engine scenarios.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::Utc;
use orderline_core::{CreateOrderRequest, OrderItemRequest, Product};
use orderline_db::repository::product::generate_product_id;
use orderline_db::{Database, DbConfig};
use orderline_engine::OrderService;
use uuid::Uuid;

pub async fn in_memory_service() -> OrderService {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    OrderService::new(db)
}

pub async fn add_product(service: &OrderService, name: &str, price_cents: i64, stock: i64) -> Product {
    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: name.to_string(),
        price_cents,
        stock,
        category: None,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    service.database().products().insert(&product).await.unwrap()
}

pub async fn stock_of(service: &OrderService, product_id: &str) -> i64 {
    service
        .database()
        .products()
        .stock_of(product_id)
        .await
        .unwrap()
        .unwrap()
}

pub async fn set_stock(service: &OrderService, product_id: &str, stock: i64) {
    let products = service.database().products();
    let mut product = products.get_by_id(product_id).await.unwrap().unwrap();
    product.stock = stock;
    products.save(&product).await.unwrap();
}

pub fn request(email: &str, lines: &[(&str, i64)]) -> CreateOrderRequest {
    CreateOrderRequest::new(
        "Ada Lovelace",
        email,
        lines
            .iter()
            .map(|(id, qty)| OrderItemRequest::new(*id, *qty))
            .collect(),
    )
}

/// A uniquely named database file, removed (with its WAL files) on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("orderline-test-{}.db", Uuid::new_v4()));
        TempDb { path }
    }

    pub async fn service(&self, max_connections: u32) -> OrderService {
        let config = DbConfig::new(&self.path).max_connections(max_connections);
        OrderService::new(Database::new(config).await.unwrap())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
