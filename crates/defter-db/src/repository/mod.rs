//! # Repository Module
//!
//! Database repository implementations for Defter.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  API Handler                                                            │
//! │       │                                                                 │
//! │       │  db.cashbook().get_balance(&company_id)                         │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CashBookRepository                                                     │
//! │  ├── create(&self, company_id, user_id, entry)                          │
//! │  ├── update(&self, company_id, id, patch)                               │
//! │  ├── delete(&self, company_id, id)                                      │
//! │  └── get_balance(&self, company_id)                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • Easy to test against an in-memory database                           │
//! │  • SQL is isolated in one place                                         │
//! │  • Every query is company-scoped in exactly one layer                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`cashbook::CashBookRepository`] - cash-book ledger with running balances
//! - [`customer::CustomerRepository`] - customer master data
//! - [`supplier::SupplierRepository`] - supplier master data
//! - [`product::ProductRepository`] - products, stock and low-stock listing
//! - [`invoice::InvoiceRepository`] - invoices with items and stock coupling
//! - [`transaction::TransactionRepository`] - general income/expense records
//! - [`user::UserRepository`] - users and companies

pub mod cashbook;
pub mod customer;
pub mod invoice;
pub mod product;
pub mod supplier;
pub mod transaction;
pub mod user;
