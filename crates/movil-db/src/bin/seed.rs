//! # Seed Data Generator
//!
//! Populates the database with demo users, brands and phone products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./movil.db)
//! cargo run -p movil-db --bin seed
//!
//! # Specify database path
//! cargo run -p movil-db --bin seed -- --db ./data/movil.db
//! MOVIL_DATABASE_PATH=./data/movil.db cargo run -p movil-db --bin seed
//! ```
//!
//! ## Generated Data
//! - one ADMIN and one CLIENT demo user (password hashes are placeholders;
//!   real credentials are issued by the external identity service)
//! - five phone brands
//! - a handful of models per brand with realistic prices and stock

use chrono::Utc;
use std::env;
use tracing::info;
use uuid::Uuid;

use movil_core::{NewProduct, Role, User};
use movil_db::{Database, DbConfig};

/// Brand name plus (model, price in cents, stock) tuples.
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Samsung",
        &[
            ("Galaxy A54", 129_900, 15),
            ("Galaxy S23", 349_900, 8),
            ("Galaxy Z Flip5", 449_900, 4),
        ],
    ),
    (
        "Apple",
        &[
            ("iPhone 13", 329_900, 10),
            ("iPhone 15", 499_900, 6),
            ("iPhone 15 Pro", 619_900, 3),
        ],
    ),
    (
        "Xiaomi",
        &[
            ("Redmi Note 12", 89_900, 25),
            ("Poco X5 Pro", 119_900, 18),
            ("Xiaomi 13T", 249_900, 7),
        ],
    ),
    (
        "Motorola",
        &[("Moto G84", 99_900, 20), ("Edge 40", 189_900, 9)],
    ),
    (
        "Huawei",
        &[("Nova 11", 149_900, 12), ("P60 Pro", 399_900, 5)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path();
    info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    seed_users(&db).await?;
    seed_catalog(&db).await?;

    let count = db.products().count().await?;
    info!(products = count, "Seed complete");

    db.close().await;
    Ok(())
}

/// Resolves the database path from `--db <path>` or MOVIL_DATABASE_PATH.
fn parse_db_path() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--db") {
        if let Some(path) = args.get(pos + 1) {
            return path.clone();
        }
    }
    env::var("MOVIL_DATABASE_PATH").unwrap_or_else(|_| "./movil.db".to_string())
}

async fn seed_users(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();

    let demo_users = [
        User {
            id: Uuid::new_v4().to_string(),
            username: "admin".to_string(),
            full_name: "Store Admin".to_string(),
            email: "admin@movilshop.test".to_string(),
            password_hash: "<issued-externally>".to_string(),
            role: Role::Admin,
            created_at: now,
        },
        User {
            id: Uuid::new_v4().to_string(),
            username: "cliente".to_string(),
            full_name: "Cliente Demo".to_string(),
            email: "cliente@movilshop.test".to_string(),
            password_hash: "<issued-externally>".to_string(),
            role: Role::Client,
            created_at: now,
        },
    ];

    for user in &demo_users {
        db.users().insert(user).await?;
        info!(username = %user.username, role = ?user.role, "Seeded user");
    }

    Ok(())
}

async fn seed_catalog(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for (brand_name, models) in CATALOG {
        let brand = db.brands().insert(brand_name).await?;

        for (model, price_cents, stock) in *models {
            let new = NewProduct {
                model: model.to_string(),
                description: Some(format!("{} {}", brand_name, model)),
                price_cents: *price_cents,
                stock: *stock,
                brand_id: Some(brand.id),
            };
            db.products().insert(&new, None).await?;
        }

        info!(brand = %brand.name, models = models.len(), "Seeded brand");
    }

    Ok(())
}
