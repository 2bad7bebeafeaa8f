//! # Balance Calculator
//!
//! Pure arithmetic for the cash-book running balance.
//!
//! ## Where This Fits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Cash Book Balance Maintenance                    │
//! │                                                                     │
//! │  Every cash-book row stores the running balance AFTER that entry   │
//! │  is applied, denormalized at write time:                            │
//! │                                                                     │
//! │    date        type      amount    balance                          │
//! │    ─────────   ───────   ───────   ────────                         │
//! │    2026-01-01  CASH_IN    1000      1000                            │
//! │    2026-01-05  CASH_OUT    300       700                            │
//! │    2026-01-09  CASH_IN     200       900                            │
//! │                                                                     │
//! │  When an earlier entry changes, every later-dated entry's stored   │
//! │  balance shifts by a single constant delta. This module computes   │
//! │  the new balance and those deltas; the repository applies them.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! For a company's entries ordered by `date` ascending, folding
//! `balance[i] = balance[i-1] ± amount[i]` from zero must reproduce every
//! stored balance exactly, after every mutation.

use chrono::{DateTime, Datelike, Days, Local, TimeZone, Utc};

use crate::money::Money;
use crate::types::CashEntryType;

/// Computes the running balance after applying an entry to `prior`.
///
/// CASH_IN adds to the balance, CASH_OUT subtracts from it.
#[inline]
pub fn new_balance(prior: Money, entry_type: CashEntryType, amount: Money) -> Money {
    match entry_type {
        CashEntryType::CashIn => prior + amount,
        CashEntryType::CashOut => prior - amount,
    }
}

/// Computes the delta applied to every later-dated entry's stored balance
/// when one entry's type/amount changes.
///
/// The four cases, exactly as the balance fold dictates:
///
/// | old       | new       | delta                      |
/// |-----------|-----------|----------------------------|
/// | CASH_IN   | CASH_IN   | `new_amount - old_amount`  |
/// | CASH_OUT  | CASH_OUT  | `old_amount - new_amount`  |
/// | CASH_IN   | CASH_OUT  | `-(old_amount + new_amount)` |
/// | CASH_OUT  | CASH_IN   | `old_amount + new_amount`  |
///
/// The updated entry's own balance moves by the same delta
/// (`balance' = balance + delta`), which keeps the fold consistent.
pub fn update_delta(
    old_type: CashEntryType,
    old_amount: Money,
    new_type: CashEntryType,
    new_amount: Money,
) -> Money {
    use CashEntryType::{CashIn, CashOut};

    match (old_type, new_type) {
        (CashIn, CashIn) => new_amount - old_amount,
        (CashOut, CashOut) => old_amount - new_amount,
        (CashIn, CashOut) => -(old_amount + new_amount),
        (CashOut, CashIn) => old_amount + new_amount,
    }
}

/// Computes the delta applied to every later-dated entry's stored balance
/// when an entry is deleted.
///
/// Removing an inflow lowers all downstream balances by the amount;
/// removing an outflow raises them.
#[inline]
pub fn delete_delta(entry_type: CashEntryType, amount: Money) -> Money {
    match entry_type {
        CashEntryType::CashIn => -amount,
        CashEntryType::CashOut => amount,
    }
}

/// Returns today's `[midnight, next midnight)` window in local time,
/// expressed as UTC instants for querying.
///
/// The balance summary ("today's income/expense") counts entries whose
/// effective date falls inside this window.
pub fn today_window(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = Local
        .with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        // Ambiguous local midnights (DST) resolve to the earlier instant.
        .earliest()
        .unwrap_or(now);
    let next_midnight = midnight
        .checked_add_days(Days::new(1))
        .unwrap_or(midnight);

    (
        midnight.with_timezone(&Utc),
        next_midnight.with_timezone(&Utc),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use CashEntryType::{CashIn, CashOut};

    fn kurus(v: i64) -> Money {
        Money::from_kurus(v)
    }

    #[test]
    fn test_new_balance() {
        assert_eq!(new_balance(kurus(0), CashIn, kurus(1000)), kurus(1000));
        assert_eq!(new_balance(kurus(1000), CashOut, kurus(300)), kurus(700));
        // The calculator itself never guards negatives; that is the
        // mutation service's create-time check.
        assert_eq!(new_balance(kurus(100), CashOut, kurus(400)), kurus(-300));
    }

    #[test]
    fn test_update_delta_same_type() {
        // CASH_IN 100 → CASH_IN 150: downstream gains 50
        assert_eq!(
            update_delta(CashIn, kurus(100), CashIn, kurus(150)),
            kurus(50)
        );
        // CASH_OUT 100 → CASH_OUT 40: spending less, downstream gains 60
        assert_eq!(
            update_delta(CashOut, kurus(100), CashOut, kurus(40)),
            kurus(60)
        );
    }

    #[test]
    fn test_update_delta_type_flip() {
        // CASH_IN 100 → CASH_OUT 40: lose the inflow AND gain an outflow
        assert_eq!(
            update_delta(CashIn, kurus(100), CashOut, kurus(40)),
            kurus(-140)
        );
        // CASH_OUT 100 → CASH_IN 40: inverse case
        assert_eq!(
            update_delta(CashOut, kurus(100), CashIn, kurus(40)),
            kurus(140)
        );
    }

    #[test]
    fn test_update_delta_matches_fold_difference() {
        // The delta must equal new_effect - old_effect for every pair,
        // where effect(CASH_IN, a) = +a and effect(CASH_OUT, a) = -a.
        let cases = [
            (CashIn, 100, CashIn, 150),
            (CashIn, 100, CashOut, 40),
            (CashOut, 100, CashIn, 40),
            (CashOut, 100, CashOut, 70),
        ];
        for (ot, oa, nt, na) in cases {
            let effect = |t: CashEntryType, a: i64| match t {
                CashIn => a,
                CashOut => -a,
            };
            let expected = effect(nt, na) - effect(ot, oa);
            assert_eq!(
                update_delta(ot, kurus(oa), nt, kurus(na)),
                kurus(expected),
                "case {:?} {} -> {:?} {}",
                ot,
                oa,
                nt,
                na
            );
        }
    }

    #[test]
    fn test_delete_delta() {
        assert_eq!(delete_delta(CashIn, kurus(500)), kurus(-500));
        assert_eq!(delete_delta(CashOut, kurus(300)), kurus(300));
    }

    #[test]
    fn test_today_window_is_one_day() {
        let now = Local::now();
        let (start, end) = today_window(now);
        assert_eq!(end - start, chrono::Duration::days(1));
        assert!(start <= now.with_timezone(&Utc));
        assert!(now.with_timezone(&Utc) < end);
    }
}
