//! # Seed Data Generator
//!
//! Populates the database with a demo company for development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p defter-db --bin seed
//!
//! # Specify database path
//! cargo run -p defter-db --bin seed -- --db ./data/defter.db
//! ```
//!
//! ## Generated Data
//! - One company ("Demo Ticaret") with an admin user
//! - A handful of customers, suppliers and products
//! - A month of cash-book entries (opening balance, sales, expenses)
//! - Matching income/expense transactions
//!
//! The admin login is `demo@defter.app` / `demo1234` (the hash below is
//! precomputed so this binary stays free of the argon2 dependency).

use chrono::{Duration, Utc};
use std::env;

use defter_core::{CashEntryType, Money, TransactionType, UserRole};
use defter_db::repository::cashbook::NewCashBookEntry;
use defter_db::repository::customer::CustomerInput;
use defter_db::repository::product::ProductInput;
use defter_db::repository::supplier::SupplierInput;
use defter_db::repository::transaction::TransactionInput;
use defter_db::repository::user::{NewCompany, NewUser};
use defter_db::{Database, DbConfig};

/// argon2id hash of "demo1234".
const DEMO_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2VlZGRlbW9zYWx0$J1zAqnlYTxckbrF6cWo30mDK0oDnGDDwUPaZY6NSE2M";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./defter_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Defter Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./defter_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Defter Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.users().find_by_email("demo@defter.app").await?.is_some() {
        println!("⚠ Demo data already present, skipping.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let user = db
        .users()
        .create(NewUser {
            email: "demo@defter.app".to_string(),
            password_hash: DEMO_PASSWORD_HASH.to_string(),
            first_name: "Demo".to_string(),
            last_name: "Kullanıcı".to_string(),
            role: UserRole::Admin,
        })
        .await?;

    let company = db
        .users()
        .create_company(
            &user.id,
            NewCompany {
                name: "Demo Ticaret".to_string(),
                tax_number: Some("1234567890".to_string()),
                address: Some("Atatürk Cad. No: 1, İstanbul".to_string()),
                phone: Some("0212 555 0000".to_string()),
                email: Some("info@demoticaret.example".to_string()),
            },
        )
        .await?;
    println!("✓ Company '{}' with admin user", company.name);

    for name in ["Ayşe Market", "Mehmet Gıda", "Zeynep İnşaat"] {
        db.customers()
            .create(
                &company.id,
                CustomerInput {
                    name: name.to_string(),
                    email: None,
                    phone: None,
                    address: None,
                    tax_number: None,
                },
            )
            .await?;
    }

    for name in ["Anadolu Toptan", "Marmara Dağıtım"] {
        db.suppliers()
            .create(
                &company.id,
                SupplierInput {
                    name: name.to_string(),
                    email: None,
                    phone: None,
                    address: None,
                    tax_number: None,
                },
            )
            .await?;
    }

    let products: &[(&str, i64, i64)] = &[
        ("Su 0.5L", 500, 120),
        ("Çay 1kg", 12_500, 40),
        ("Kahve 250g", 18_900, 25),
        ("Defter A4", 3_500, 3),
    ];
    for (name, price, stock) in products {
        db.products()
            .create(
                &company.id,
                ProductInput {
                    name: name.to_string(),
                    description: None,
                    price_kurus: *price,
                    cost_kurus: Some(price * 6 / 10),
                    barcode: None,
                    category: None,
                    unit: "adet".to_string(),
                    stock: *stock,
                    min_stock: 5,
                },
            )
            .await?;
    }
    println!("✓ Master data (customers, suppliers, products)");

    // A month of cash movements, oldest first so the create-time guard
    // sees a growing balance.
    let today = Utc::now();
    let movements: &[(CashEntryType, i64, &str, i64)] = &[
        (CashEntryType::CashIn, 500_000, "Açılış bakiyesi", 30),
        (CashEntryType::CashIn, 85_000, "Gün sonu satış", 25),
        (CashEntryType::CashOut, 150_000, "Kira ödemesi", 20),
        (CashEntryType::CashIn, 92_500, "Gün sonu satış", 14),
        (CashEntryType::CashOut, 37_500, "Toptancı ödemesi", 7),
        (CashEntryType::CashIn, 61_000, "Gün sonu satış", 2),
    ];
    for (entry_type, amount, description, days_ago) in movements {
        db.cashbook()
            .create(
                &company.id,
                &user.id,
                NewCashBookEntry {
                    entry_type: *entry_type,
                    amount: Money::from_kurus(*amount),
                    description: description.to_string(),
                    date: today - Duration::days(*days_ago),
                    category: None,
                    reference: None,
                    notes: None,
                    customer_id: None,
                    supplier_id: None,
                },
            )
            .await?;

        let tx_type = match entry_type {
            CashEntryType::CashIn => TransactionType::Income,
            CashEntryType::CashOut => TransactionType::Expense,
        };
        db.transactions()
            .create(
                &company.id,
                &user.id,
                TransactionInput {
                    tx_type,
                    amount_kurus: *amount,
                    description: description.to_string(),
                    date: today - Duration::days(*days_ago),
                    category: None,
                    reference: None,
                    customer_id: None,
                    supplier_id: None,
                },
            )
            .await?;
    }

    let summary = db.cashbook().get_balance(&company.id).await?;
    println!(
        "✓ Cash book seeded, current balance: {}",
        Money::from_kurus(summary.current_balance_kurus)
    );

    println!();
    println!("✓ Seed complete!");
    println!("  Login: demo@defter.app / demo1234");

    Ok(())
}
