//! # Domain Types
//!
//! Core domain types used throughout Defter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │ CashBookEntry │   │    Invoice    │   │  Transaction  │         │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │         │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ id (UUID)     │         │
//! │  │ company_id    │   │ invoice_number│   │ company_id    │         │
//! │  │ entry_type    │   │ status/type   │   │ tx_type       │         │
//! │  │ amount_kurus  │   │ total_kurus   │   │ amount_kurus  │         │
//! │  │ balance_kurus │   │ items[]       │   └───────────────┘         │
//! │  └───────────────┘   └───────────────┘                             │
//! │                                                                     │
//! │  Master data: Customer, Supplier, Product                           │
//! │  Accounts:    User, Company                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tenancy
//! Every business record carries a `company_id`. All repository operations
//! are scoped to exactly one company; no cross-company visibility or
//! mutation is ever permitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cash Book
// =============================================================================

/// Direction of a cash-book movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashEntryType {
    /// Money flowing into the cash box.
    CashIn,
    /// Money flowing out of the cash box.
    CashOut,
}

/// A single dated cash movement with its denormalized running balance.
///
/// `balance_kurus` is the running cash balance *after* this entry is
/// applied, computed and stored at write time. `date` is the effective
/// date of the movement (caller-supplied, may be historical) and is the
/// ordering key for the balance fold; `created_at` is bookkeeping only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashBookEntry {
    pub id: String,
    pub company_id: String,
    /// User who recorded the entry (audit only, not ownership).
    pub user_id: String,
    #[serde(rename = "type")]
    pub entry_type: CashEntryType,
    /// Magnitude of the movement, always positive.
    pub amount_kurus: i64,
    pub description: String,
    /// Effective date of the movement, distinct from record creation time.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    /// Optional counterparty (weak reference, lookup only).
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    /// Running balance after this entry.
    pub balance_kurus: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CashBookEntry {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_kurus(self.amount_kurus)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_kurus(self.balance_kurus)
    }
}

/// Snapshot of the cash position returned by the balance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashBalanceSummary {
    pub current_balance_kurus: i64,
    pub today_income_kurus: i64,
    pub today_expense_kurus: i64,
    pub today_net_kurus: i64,
    pub today_entries: i64,
}

/// Aggregate cash-book statistics over an optional date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashBookStats {
    pub total_cash_in_kurus: i64,
    pub total_cash_out_kurus: i64,
    pub net_cash_kurus: i64,
    pub cash_in_count: i64,
    pub cash_out_count: i64,
    pub current_balance_kurus: i64,
}

// =============================================================================
// Master Data
// =============================================================================

/// A customer of the company.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A supplier of the company. Same shape as [`Customer`], kept separate
/// because invoices and ledger entries reference them independently.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A product or service line the company buys and sells.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Selling price in kuruş.
    pub price_kurus: i64,
    /// Purchase cost in kuruş (for margin reporting).
    pub cost_kurus: Option<i64>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    /// Unit of sale ("adet", "kg", ...).
    pub unit: String,
    pub stock: i64,
    /// Low-stock threshold for reorder listings.
    pub min_stock: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_kurus(self.price_kurus)
    }

    /// Whether the product is at or below its reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// Invoices
// =============================================================================

/// Whether an invoice records a sale to a customer or a purchase from a
/// supplier. The type also decides the direction of stock coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    Sale,
    Purchase,
}

/// Invoice lifecycle status. PAID invoices are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

/// An invoice header. Totals are computed server-side from the items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub company_id: String,
    pub invoice_number: String,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    /// Counterparty: customer for SALE, supplier for PURCHASE.
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub subtotal_kurus: i64,
    /// Tax rate in basis points (2000 = 20% KDV).
    pub tax_rate_bps: u32,
    pub tax_amount_kurus: i64,
    pub total_kurus: i64,
    #[ts(as = "String")]
    pub issue_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A line item on an invoice.
/// Unit price is frozen at invoice time; later product price changes do
/// not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_kurus: i64,
    pub line_total_kurus: i64,
}

/// Aggregate invoice statistics by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceStatusStat {
    pub status: InvoiceStatus,
    pub count: i64,
    pub total_kurus: i64,
}

// =============================================================================
// General Transactions
// =============================================================================

/// Direction of a general income/expense record.
///
/// Deliberately independent of the cash book: transactions carry no
/// running balance and no propagation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A general income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount_kurus: i64,
    pub description: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Totals by type plus net, over an optional date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionStats {
    pub total_income_kurus: i64,
    pub total_expense_kurus: i64,
    pub net_income_kurus: i64,
    pub income_count: i64,
    pub expense_count: i64,
}

/// One month's bucket in the yearly summary (month is 1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyStat {
    pub month: u32,
    pub income_kurus: i64,
    pub expense_kurus: i64,
    pub net_kurus: i64,
}

// =============================================================================
// Accounts
// =============================================================================

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// An authenticated account. The argon2 password hash never leaves the
/// backend (skipped on serialization).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// None until the user creates or joins a company.
    pub company_id: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The owning tenant for all business records.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub tax_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
