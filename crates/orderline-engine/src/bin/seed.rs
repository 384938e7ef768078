//! # Seed Data Generator
//!
//! Populates the database with products and a few orders for development.
//!
//! ## Usage
//! ```bash
//! # 50 products (default) into ORDERLINE_DATABASE_PATH or ./orderline.db
//! cargo run -p orderline-engine --bin seed
//!
//! # Custom amount and path
//! cargo run -p orderline-engine --bin seed -- --count 200 --db ./data/orderline.db
//! ```
//!
//! Each product gets a price between 1.99 and 9.99 plus a size add-on and a
//! stock between 0 and 40. Then one order per demo customer is created and
//! walked through part of its lifecycle.

use chrono::Utc;
use std::env;

use orderline_core::{CreateOrderRequest, OrderItemRequest, OrderStatus, Product};
use orderline_db::repository::product::generate_product_id;
use orderline_engine::{init_tracing, EngineConfig, OrderService};

/// Product families for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "tools",
        &["Hammer", "Screwdriver", "Wrench", "Pliers", "Tape Measure"],
    ),
    (
        "garden",
        &["Trowel", "Watering Can", "Hose", "Rake", "Pruning Shears"],
    ),
    (
        "kitchen",
        &["Chef Knife", "Cutting Board", "Skillet", "Whisk", "Colander"],
    ),
];

/// Size variants and their price add-on in cents
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 150), ("Large", 300), ("XL", 500)];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Ada Lovelace", "ada@example.com"),
    ("Grace Hopper", "grace@example.com"),
    ("Alan Turing", "alan@example.com"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = EngineConfig::from_env()?;
    init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().collect();
    let mut count: usize = 50;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Orderline Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./orderline.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Orderline Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!("Products: {}", count);
    println!();

    let service = OrderService::connect(&config).await?;
    let products = service.database().products();

    let existing = products.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut seeded = Vec::with_capacity(count);
    let start = std::time::Instant::now();

    'outer: for (category, names) in CATEGORIES {
        for name in names.iter() {
            for (size, addon) in SIZES {
                if seeded.len() >= count {
                    break 'outer;
                }

                let product = generate_product(category, name, size, *addon, seeded.len());
                if let Err(e) = products.insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                seeded.push(product);
            }
        }
    }

    println!("✓ Generated {} products in {:?}", seeded.len(), start.elapsed());

    // One order per customer, each taken a different distance through its lifecycle
    let in_stock: Vec<&Product> = seeded.iter().filter(|p| p.stock >= 2).collect();
    let targets = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
    ];

    for (idx, ((name, email), target)) in CUSTOMERS.iter().zip(targets).enumerate() {
        let picks: Vec<OrderItemRequest> = in_stock
            .iter()
            .skip(idx * 2)
            .take(2)
            .map(|p| OrderItemRequest::new(p.id.clone(), 1 + (idx as i64 % 2)))
            .collect();

        if picks.is_empty() {
            break;
        }

        let order = service
            .create_order(CreateOrderRequest::new(*name, *email, picks))
            .await?;

        for step in [OrderStatus::Confirmed, OrderStatus::Shipped] {
            if order_rank(step) > order_rank(target) {
                break;
            }
            service.change_order_status(&order.id, step).await?;
        }

        println!(
            "✓ Order {} for {} ({}, total {})",
            order.id,
            email,
            target,
            order.total_amount()
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn order_rank(status: OrderStatus) -> usize {
    OrderStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or(usize::MAX)
}

/// Generates a single product with deterministic data.
fn generate_product(category: &str, name: &str, size: &str, price_addon: i64, seed: usize) -> Product {
    let now = Utc::now();

    // 1.99 - 9.99 + size add-on
    let base_price = 199 + ((seed * 17) % 800) as i64;

    Product {
        id: generate_product_id(),
        name: format!("{} {}", name, size),
        price_cents: base_price + price_addon,
        stock: ((seed * 7) % 41) as i64,
        category: Some(category.to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
