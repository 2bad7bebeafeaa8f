//! # Error Types
//!
//! Domain-specific error types for defter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  defter-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  defter-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  API errors (apps/api)                                              │
//! │  └── ApiError         - What the frontend sees (HTTP + envelope)    │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, current balance, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations and are translated into
/// client-visible responses by the API layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A CASH_OUT entry would drive the cash balance below zero.
    ///
    /// ## When This Occurs
    /// Only at create time, and only against the company's latest-by-date
    /// balance. Retroactive updates and deletes are allowed to push
    /// downstream balances negative without error (deliberate: the
    /// product treats historical corrections as authoritative).
    #[error("Insufficient cash balance: current balance is {current}")]
    InsufficientBalance {
        /// Balance before the rejected entry, for user feedback.
        current: Money,
    },

    /// Cash-book entry cannot be found under the caller's company.
    #[error("Cash book entry not found: {0}")]
    EntryNotFound(String),

    /// A paid invoice was targeted by an update or delete.
    #[error("Invoice {0} is paid and cannot be modified")]
    InvoicePaid(String),

    /// A stock subtraction would take the product below zero.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs, when a request value does not meet
/// basic requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (malformed email, unknown enum value, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. registering an existing email).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
