//! # defter-db: Database Layer for Defter
//!
//! This crate provides database access for the Defter accounting backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Defter Data Flow                                │
//! │                                                                         │
//! │  API Handler (POST /api/cashbook)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     defter-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │ (cashbook.rs) │    │  (embedded)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ SqlitePool    │    │ CashBookRepo  │    │ 001_initial_ │   │   │
//! │  │   │ Connection    │◄───│ InvoiceRepo   │    │ schema.sql   │   │   │
//! │  │   │ Management    │    │ ProductRepo   │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./data/defter.db                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (cashbook, invoice, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use defter_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/defter.db")).await?;
//!
//! let summary = db.cashbook().get_balance(&company_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cashbook::{
    CashBookEntryPatch, CashBookFilter, CashBookRepository, NewCashBookEntry,
};
pub use repository::customer::{CustomerInput, CustomerRepository};
pub use repository::invoice::{InvoiceRepository, NewInvoice, NewInvoiceItem};
pub use repository::product::{ProductInput, ProductRepository};
pub use repository::supplier::{SupplierInput, SupplierRepository};
pub use repository::transaction::{TransactionFilter, TransactionInput, TransactionRepository};
pub use repository::user::{NewCompany, NewUser, UserRepository};
