//! # Seed Data Generator
//!
//! Populates a database with a small development catalog plus a default
//! cashier and a couple of registered clients.
//!
//! ## Usage
//! ```bash
//! cargo run -p tienda-db --bin seed
//! cargo run -p tienda-db --bin seed -- --db ./data/tienda.db
//! ```

use chrono::Utc;
use std::env;
use tienda_core::Product;
use tienda_db::{new_id, Database, DbConfig};
use tracing::info;

/// (name, price_cents, stock, stock_minimum)
const CATALOG: &[(&str, i64, i64, i64)] = &[
    ("Coca-Cola 600ml", 250, 48, 12),
    ("Agua Mineral 1L", 120, 60, 12),
    ("Leche Entera 1L", 180, 30, 8),
    ("Pan Blanco", 95, 25, 10),
    ("Arroz 1kg", 210, 40, 10),
    ("Frijol Negro 1kg", 260, 35, 10),
    ("Aceite Vegetal 900ml", 390, 20, 6),
    ("Azúcar 1kg", 175, 45, 10),
    ("Café Molido 250g", 520, 18, 5),
    ("Galletas Surtidas", 140, 55, 15),
    ("Jabón de Baño", 110, 40, 10),
    ("Detergente 500g", 230, 22, 6),
    ("Papel Higiénico 4u", 310, 28, 8),
    ("Atún en Lata", 190, 50, 12),
    ("Pasta Espagueti 500g", 130, 38, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./data/tienda.db".to_string());

    info!(path = %db_path, "seeding database");

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let now = Utc::now();
    let products = db.products();

    for (name, price_cents, stock, stock_minimum) in CATALOG {
        let product = Product {
            id: new_id(),
            name: name.to_string(),
            price_cents: *price_cents,
            stock: *stock,
            stock_minimum: *stock_minimum,
            supplier_id: None,
            barcode: None,
            active: true,
            created_at: now,
            updated_at: now,
        };
        products.insert(&product).await?;
    }

    let lookups = db.lookups();
    lookups.upsert_user("user-1", "cajero1").await?;
    lookups.upsert_client("client-1", "María López").await?;
    lookups.upsert_client("client-2", "Juan Pérez").await?;

    info!(products = CATALOG.len(), "seed complete");

    db.close().await;
    Ok(())
}

/// Tiny flag parser: `--db <path>` is the only option.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1).cloned())
}
