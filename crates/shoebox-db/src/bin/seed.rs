//! # Seed Data Generator
//!
//! Populates a database with sample shoes for development.
//!
//! ## Usage
//! ```bash
//! # Generate 40 models (default)
//! cargo run -p shoebox-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p shoebox-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p shoebox-db --bin seed -- --db ./data/shoebox.db
//! ```
//!
//! ## Generated Data
//! - Shoe models across lines (runners, boots, sandals, ...) with a size run
//! - Stock for every declared size, recorded as replenishment movements
//! - One exchange rate (1500.000)
//! - One supplier

use chrono::Utc;
use shoebox_core::{ExchangeRate, MovementReason, Product, SizeSet, Supplier};
use shoebox_db::{Database, DbConfig, MovementRepository, StockRepository};
use std::env;
use uuid::Uuid;

/// Product lines for realistic test data: (line, models, size run)
const LINES: &[(&str, &[&str], &[&str])] = &[
    (
        "Runner",
        &["Swift", "Tempo", "Glide", "Pulse", "Stride", "Vapor", "Arc", "Dash"],
        &["38", "39", "40", "41", "42", "43", "44"],
    ),
    (
        "Boot",
        &["Ranger", "Summit", "Timber", "Ridge", "Nomad", "Forge"],
        &["39", "40", "41", "42", "43", "44", "45"],
    ),
    (
        "Sandal",
        &["Coast", "Breeze", "Lagoon", "Dune"],
        &["36", "37", "38", "39", "40", "41"],
    ),
    (
        "Court",
        &["Ace", "Baseline", "Rally", "Volley", "Smash"],
        &["38", "39", "40", "41", "42", "43"],
    ),
    (
        "Loafer",
        &["Classic", "Penny", "Tassel", "Milano"],
        &["39", "40", "41", "42", "43"],
    ),
];

/// Colorways multiply models into distinct catalog entries.
const COLORWAYS: &[&str] = &["Black", "White", "Navy", "Sand", "Olive"];

const DEFAULT_RATE: ExchangeRate = ExchangeRate::from_major(1500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./shoebox_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shoebox Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of shoe models to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./shoebox_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shoebox Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Models:   {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating shoes...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut pairs = 0;

    'outer: for colorway in COLORWAYS {
        for (line_idx, (line, models, sizes)) in LINES.iter().enumerate() {
            for (model_idx, model) in models.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = line_idx * 100 + model_idx * 7 + generated;
                let product = generate_product(line, model, colorway, sizes, seed)?;

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                pairs += stock_product(&db, &product, seed).await?;
                generated += 1;

                if generated % 10 == 0 {
                    println!("  Generated {} models...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} models ({} pairs) in {:?}", generated, pairs, elapsed);

    let rate = db.rates().append(DEFAULT_RATE).await?;
    println!("✓ Exchange rate set to {}", rate.rate());

    let supplier = Supplier {
        id: Uuid::new_v4().to_string(),
        name: "Atlas Footwear Wholesale".to_string(),
        contact: Some("orders@atlas-footwear.example".to_string()),
        address: None,
        notes: Some("Net 30 on credit purchases".to_string()),
        created_at: Utc::now(),
    };
    db.suppliers().insert(&supplier).await?;
    println!("✓ Supplier '{}' created", supplier.name);

    let low = db.stock().list_below(shoebox_core::DEFAULT_LOW_STOCK_THRESHOLD).await?;
    println!("  Low stock variants: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog entry.
fn generate_product(
    line: &str,
    model: &str,
    colorway: &str,
    sizes: &[&str],
    seed: usize,
) -> Result<Product, Box<dyn std::error::Error>> {
    let now = Utc::now();

    // List price 30000.00 - 89900.00 local, in steps of 100.00
    let price_cents = (30_000 + ((seed * 37) % 600) as i64 * 100) * 100;

    // Cost basis 12.00 - 35.99 foreign
    let cost_cents = 1200 + ((seed * 53) % 2400) as i64;

    Ok(Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {} {}", line, model, colorway),
        sizes: SizeSet::from_labels(sizes.iter().copied())?,
        price_cents,
        cost_cents,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

/// Stocks 0-12 pairs per declared size. Returns the pairs added.
async fn stock_product(
    db: &Database,
    product: &Product,
    seed: usize,
) -> Result<i64, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    let mut total = 0;

    for (idx, size) in product.sizes.iter().enumerate() {
        let qty = ((seed + idx * 5) % 13) as i64;
        if qty == 0 {
            continue;
        }

        StockRepository::increment(&mut tx, &product.id, size, qty).await?;
        MovementRepository::record(&mut tx, &product.id, size, qty, MovementReason::Replenishment, None)
            .await?;
        total += qty;
    }

    tx.commit().await?;
    Ok(total)
}
