//! # defter-core: Pure Business Logic for Defter
//!
//! This crate is the **heart** of Defter. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Defter Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    SPA Frontend                             │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │ REST / JSON                        │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  apps/api (axum handlers)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ defter-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐ │   │
//! │  │   │  types   │  │  money   │  │ balance  │  │ validation │ │   │
//! │  │   │ entries  │  │  Money   │  │  deltas  │  │   rules    │ │   │
//! │  │   │ invoices │  │  kuruş   │  │  window  │  │   checks   │ │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └────────────┘ │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 defter-db (Database Layer)                  │   │
//! │  │           SQLite queries, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashBookEntry, Invoice, Customer, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`balance`] - Cash-book running-balance calculator
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are kuruş (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use defter_core::balance::{new_balance, update_delta};
//! use defter_core::money::Money;
//! use defter_core::types::CashEntryType;
//!
//! // A CASH_OUT of ₺3.00 against a ₺10.00 balance leaves ₺7.00
//! let prior = Money::from_kurus(1000);
//! let after = new_balance(prior, CashEntryType::CashOut, Money::from_kurus(300));
//! assert_eq!(after.kurus(), 700);
//!
//! // Changing a CASH_IN of 100 into a CASH_OUT of 40 shifts every
//! // later-dated balance by -140
//! let delta = update_delta(
//!     CashEntryType::CashIn,
//!     Money::from_kurus(100),
//!     CashEntryType::CashOut,
//!     Money::from_kurus(40),
//! );
//! assert_eq!(delta.kurus(), -140);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;
