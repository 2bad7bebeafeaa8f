//! # Cash Book Repository
//!
//! Database operations for the cash-book ledger, including the
//! running-balance maintenance.
//!
//! ## Balance Maintenance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Cash Book Mutation Lifecycle                       │
//! │                                                                     │
//! │  CREATE                                                             │
//! │    └── latest-by-date balance ──► new balance ──► guard ──► INSERT  │
//! │        (0 if the book is empty)   (CASH_OUT may not go negative)    │
//! │                                                                     │
//! │  UPDATE                                                             │
//! │    └── load entry ──► delta table ──► rewrite row                   │
//! │    └── propagate: balance += delta for date > old date    ┐ one     │
//! │                                                           ┘ tx      │
//! │  DELETE                                                             │
//! │    └── load entry ──► delete delta                                  │
//! │    └── propagate: balance += delta for date > entry date  ┐ one     │
//! │    └── remove row                                         ┘ tx      │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The create-time guard checks only the latest-by-date balance. A
//! backdated CASH_OUT therefore passes the guard even if it makes an
//! intermediate historical balance negative, and updates/deletes never
//! re-check downstream balances. Both are deliberate product behavior:
//! historical corrections are authoritative.

use chrono::{DateTime, Local, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::balance::{delete_delta, new_balance, today_window, update_delta};
use defter_core::{
    CashBalanceSummary, CashBookEntry, CashBookStats, CashEntryType, CoreError, Money,
};

/// Data for a new cash-book entry. `amount` must already be validated as
/// positive by the caller.
#[derive(Debug, Clone)]
pub struct NewCashBookEntry {
    pub entry_type: CashEntryType,
    pub amount: Money,
    pub description: String,
    /// Effective date of the movement; may be historical.
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
}

/// Changes to apply to an existing entry. `entry_type` and `amount`
/// always accompany an update (they drive the balance delta); the rest
/// replace the stored values when supplied and are kept otherwise.
#[derive(Debug, Clone)]
pub struct CashBookEntryPatch {
    pub entry_type: CashEntryType,
    pub amount: Money,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
}

/// Optional filters for listing entries.
#[derive(Debug, Clone, Default)]
pub struct CashBookFilter {
    pub entry_type: Option<CashEntryType>,
    /// Inclusive range bounds on the effective date.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

const SELECT_COLUMNS: &str = "id, company_id, user_id, entry_type, amount_kurus, description, \
     date, category, reference, notes, customer_id, supplier_id, \
     balance_kurus, created_at, updated_at";

/// Repository for cash-book database operations.
///
/// This is the ledger mutation service: every method is scoped to one
/// company and each mutation is a single transaction, so the primary row
/// change and the bulk propagation become visible together or not at all.
#[derive(Debug, Clone)]
pub struct CashBookRepository {
    pool: SqlitePool,
}

impl CashBookRepository {
    /// Creates a new CashBookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashBookRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an entry by ID, scoped to the company.
    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<CashBookEntry>> {
        let entry = sqlx::query_as::<_, CashBookEntry>(&format!(
            "SELECT {SELECT_COLUMNS} FROM cashbook_entries WHERE id = ?1 AND company_id = ?2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists entries for a company, newest effective date first.
    pub async fn list(
        &self,
        company_id: &str,
        filter: &CashBookFilter,
    ) -> DbResult<Vec<CashBookEntry>> {
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS} FROM cashbook_entries WHERE company_id = ?"
        );
        if filter.entry_type.is_some() {
            sql.push_str(" AND entry_type = ?");
        }
        if filter.start_date.is_some() && filter.end_date.is_some() {
            sql.push_str(" AND date >= ? AND date <= ?");
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC");

        let mut query = sqlx::query_as::<_, CashBookEntry>(&sql).bind(company_id);
        if let Some(entry_type) = filter.entry_type {
            query = query.bind(entry_type);
        }
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            query = query.bind(start).bind(end);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Gets the company's latest entry by effective date.
    ///
    /// This is the anchor for new inserts: its stored balance is the
    /// current cash position. `created_at` breaks ties between entries
    /// sharing the same effective date.
    pub async fn latest(&self, company_id: &str) -> DbResult<Option<CashBookEntry>> {
        let entry = sqlx::query_as::<_, CashBookEntry>(&format!(
            "SELECT {SELECT_COLUMNS} FROM cashbook_entries WHERE company_id = ?1 \
             ORDER BY date DESC, created_at DESC LIMIT 1"
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates a new entry anchored to the current latest-by-date balance.
    ///
    /// ## Guard
    /// A CASH_OUT that would drive the anchor balance below zero fails
    /// with `InsufficientBalance` and writes nothing. The guard reads the
    /// latest-by-date balance only - it does not re-simulate the history,
    /// so a backdated CASH_OUT can pass even when it makes some
    /// intermediate balance negative.
    pub async fn create(
        &self,
        company_id: &str,
        user_id: &str,
        new_entry: NewCashBookEntry,
    ) -> DbResult<CashBookEntry> {
        let prior = self
            .latest(company_id)
            .await?
            .map(|e| e.balance())
            .unwrap_or(Money::zero());

        let balance = new_balance(prior, new_entry.entry_type, new_entry.amount);

        if new_entry.entry_type == CashEntryType::CashOut && balance.is_negative() {
            debug!(
                company_id,
                current = %prior,
                requested = %new_entry.amount,
                "Rejecting CASH_OUT that would overdraw the cash box"
            );
            return Err(DbError::Domain(CoreError::InsufficientBalance {
                current: prior,
            }));
        }

        let now = Utc::now();
        let entry = CashBookEntry {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            user_id: user_id.to_string(),
            entry_type: new_entry.entry_type,
            amount_kurus: new_entry.amount.kurus(),
            description: new_entry.description,
            date: new_entry.date,
            category: new_entry.category,
            reference: new_entry.reference,
            notes: new_entry.notes,
            customer_id: new_entry.customer_id,
            supplier_id: new_entry.supplier_id,
            balance_kurus: balance.kurus(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %entry.id, company_id, balance = %balance, "Inserting cash book entry");

        sqlx::query(
            "INSERT INTO cashbook_entries ( \
                id, company_id, user_id, entry_type, amount_kurus, description, \
                date, category, reference, notes, customer_id, supplier_id, \
                balance_kurus, created_at, updated_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&entry.id)
        .bind(&entry.company_id)
        .bind(&entry.user_id)
        .bind(entry.entry_type)
        .bind(entry.amount_kurus)
        .bind(&entry.description)
        .bind(entry.date)
        .bind(&entry.category)
        .bind(&entry.reference)
        .bind(&entry.notes)
        .bind(&entry.customer_id)
        .bind(&entry.supplier_id)
        .bind(entry.balance_kurus)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Updates an entry and propagates the balance delta forward.
    ///
    /// The entry's own balance moves by the delta computed from the
    /// old/new type and amount; every other same-company entry dated
    /// after the entry's *old* effective date is shifted by the same
    /// delta in one bulk statement. Both writes share one transaction.
    pub async fn update(
        &self,
        company_id: &str,
        id: &str,
        patch: CashBookEntryPatch,
    ) -> DbResult<CashBookEntry> {
        let existing = self
            .get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Cash book entry", id))?;

        let delta = update_delta(
            existing.entry_type,
            existing.amount(),
            patch.entry_type,
            patch.amount,
        );
        let balance = existing.balance() + delta;
        let now = Utc::now();

        debug!(
            id,
            company_id,
            delta = %delta,
            "Updating cash book entry with forward propagation"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE cashbook_entries SET \
                entry_type = ?1, amount_kurus = ?2, description = ?3, date = ?4, \
                category = ?5, reference = ?6, notes = ?7, \
                customer_id = ?8, supplier_id = ?9, \
                balance_kurus = ?10, updated_at = ?11 \
             WHERE id = ?12 AND company_id = ?13",
        )
        .bind(patch.entry_type)
        .bind(patch.amount.kurus())
        .bind(patch.description.as_deref().unwrap_or(&existing.description))
        .bind(patch.date.unwrap_or(existing.date))
        .bind(patch.category.as_ref().or(existing.category.as_ref()))
        .bind(patch.reference.as_ref().or(existing.reference.as_ref()))
        .bind(patch.notes.as_ref().or(existing.notes.as_ref()))
        .bind(patch.customer_id.as_ref().or(existing.customer_id.as_ref()))
        .bind(patch.supplier_id.as_ref().or(existing.supplier_id.as_ref()))
        .bind(balance.kurus())
        .bind(now)
        .bind(id)
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        // Propagation anchors on the OLD effective date even when the
        // update moves the date.
        sqlx::query(
            "UPDATE cashbook_entries SET balance_kurus = balance_kurus + ?1 \
             WHERE company_id = ?2 AND date > ?3 AND id != ?4",
        )
        .bind(delta.kurus())
        .bind(company_id)
        .bind(existing.date)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Cash book entry", id))
    }

    /// Deletes an entry and propagates the inverse of its effect to all
    /// later-dated entries, in one transaction.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let entry = self
            .get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Cash book entry", id))?;

        let delta = delete_delta(entry.entry_type, entry.amount());

        debug!(
            id,
            company_id,
            delta = %delta,
            "Deleting cash book entry with forward propagation"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE cashbook_entries SET balance_kurus = balance_kurus + ?1 \
             WHERE company_id = ?2 AND date > ?3",
        )
        .bind(delta.kurus())
        .bind(company_id)
        .bind(entry.date)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cashbook_entries WHERE id = ?1 AND company_id = ?2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    // Summaries
    // =========================================================================

    /// Gets the current balance plus today's movement summary.
    ///
    /// "Today" is the local-time `[midnight, next midnight)` window.
    pub async fn get_balance(&self, company_id: &str) -> DbResult<CashBalanceSummary> {
        let (start, end) = today_window(Local::now());
        self.balance_summary(company_id, start, end).await
    }

    /// Balance summary with an explicit window (used by `get_balance`
    /// and directly testable without clock control).
    pub async fn balance_summary(
        &self,
        company_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> DbResult<CashBalanceSummary> {
        let current_balance = self
            .latest(company_id)
            .await?
            .map(|e| e.balance_kurus)
            .unwrap_or(0);

        let rows: Vec<(CashEntryType, i64)> = sqlx::query_as(
            "SELECT entry_type, amount_kurus FROM cashbook_entries \
             WHERE company_id = ?1 AND date >= ?2 AND date < ?3",
        )
        .bind(company_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;

        let today_entries = rows.len() as i64;
        let mut today_income = 0i64;
        let mut today_expense = 0i64;
        for (entry_type, amount) in rows {
            match entry_type {
                CashEntryType::CashIn => today_income += amount,
                CashEntryType::CashOut => today_expense += amount,
            }
        }

        Ok(CashBalanceSummary {
            current_balance_kurus: current_balance,
            today_income_kurus: today_income,
            today_expense_kurus: today_expense,
            today_net_kurus: today_income - today_expense,
            today_entries,
        })
    }

    /// Aggregate totals by type over an optional inclusive date range,
    /// plus the current balance.
    pub async fn stats(
        &self,
        company_id: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DbResult<CashBookStats> {
        let mut sql = String::from(
            "SELECT entry_type, COALESCE(SUM(amount_kurus), 0), COUNT(id) \
             FROM cashbook_entries WHERE company_id = ?",
        );
        if start_date.is_some() && end_date.is_some() {
            sql.push_str(" AND date >= ? AND date <= ?");
        }
        sql.push_str(" GROUP BY entry_type");

        let mut query = sqlx::query_as::<_, (CashEntryType, i64, i64)>(&sql).bind(company_id);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            query = query.bind(start).bind(end);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut stats = CashBookStats {
            total_cash_in_kurus: 0,
            total_cash_out_kurus: 0,
            net_cash_kurus: 0,
            cash_in_count: 0,
            cash_out_count: 0,
            current_balance_kurus: 0,
        };
        for (entry_type, total, count) in rows {
            match entry_type {
                CashEntryType::CashIn => {
                    stats.total_cash_in_kurus = total;
                    stats.cash_in_count = count;
                }
                CashEntryType::CashOut => {
                    stats.total_cash_out_kurus = total;
                    stats.cash_out_count = count;
                }
            }
        }
        stats.net_cash_kurus = stats.total_cash_in_kurus - stats.total_cash_out_kurus;
        stats.current_balance_kurus = self
            .latest(company_id)
            .await?
            .map(|e| e.balance_kurus)
            .unwrap_or(0);

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    async fn setup() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let company_id = Uuid::new_v4().to_string();
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(&company_id)
        .bind("Test Şirketi")
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, company_id, is_active, created_at, updated_at) \
             VALUES (?1, ?2, 'x', 'Test', 'User', 'ADMIN', ?3, 1, ?4, ?4)",
        )
        .bind(&user_id)
        .bind(format!("{}@test.com", Uuid::new_v4()))
        .bind(&company_id)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        (db, company_id, user_id)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, d, 12, 0, 0).unwrap()
    }

    fn entry(entry_type: CashEntryType, amount: i64, date: DateTime<Utc>) -> NewCashBookEntry {
        NewCashBookEntry {
            entry_type,
            amount: Money::from_kurus(amount),
            description: "test".to_string(),
            date,
            category: None,
            reference: None,
            notes: None,
            customer_id: None,
            supplier_id: None,
        }
    }

    fn patch(entry_type: CashEntryType, amount: i64) -> CashBookEntryPatch {
        CashBookEntryPatch {
            entry_type,
            amount: Money::from_kurus(amount),
            description: None,
            date: None,
            category: None,
            reference: None,
            notes: None,
            customer_id: None,
            supplier_id: None,
        }
    }

    /// Re-folds the book chronologically and checks every stored balance.
    async fn assert_fold_consistent(repo: &CashBookRepository, company_id: &str) {
        let mut entries = repo
            .list(company_id, &CashBookFilter::default())
            .await
            .unwrap();
        entries.reverse(); // list is date-descending

        let mut running = Money::zero();
        for e in entries {
            running = new_balance(running, e.entry_type, e.amount());
            assert_eq!(
                e.balance_kurus,
                running.kurus(),
                "stored balance diverges from fold at entry {}",
                e.id
            );
        }
    }

    #[tokio::test]
    async fn create_computes_running_balance() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e1 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        assert_eq!(e1.balance_kurus, 1000);

        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 300, day(5)))
            .await
            .unwrap();
        assert_eq!(e2.balance_kurus, 700);

        let e3 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 200, day(9)))
            .await
            .unwrap();
        assert_eq!(e3.balance_kurus, 900);

        assert_fold_consistent(&repo, &company).await;
    }

    #[tokio::test]
    async fn cash_out_exceeding_balance_is_rejected_and_writes_nothing() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashOut, 300, day(5)))
            .await
            .unwrap();

        let err = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 800, day(9)))
            .await
            .unwrap_err();

        match err {
            DbError::Domain(CoreError::InsufficientBalance { current }) => {
                assert_eq!(current.kurus(), 700);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }

        let entries = repo.list(&company, &CashBookFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 2, "failed create must leave no row");
    }

    #[tokio::test]
    async fn cash_out_equal_to_balance_is_allowed() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 500, day(1)))
            .await
            .unwrap();
        let e = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 500, day(2)))
            .await
            .unwrap();
        assert_eq!(e.balance_kurus, 0);
    }

    #[tokio::test]
    async fn backdated_cash_out_is_permitted() {
        // The guard only checks the latest-by-date balance; a historical
        // CASH_OUT is accepted even though it would have overdrawn the
        // box at its own date. Same permissive behavior as the original
        // product.
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 100, day(1)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(10)))
            .await
            .unwrap();

        // At day 5 the chronological balance was only 100, but the
        // latest balance is 1100, so 800 passes the guard.
        let backdated = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 800, day(5)))
            .await
            .unwrap();
        assert_eq!(backdated.balance_kurus, 300);
    }

    #[tokio::test]
    async fn update_same_type_propagates_delta_forward() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e1 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 300, day(5)))
            .await
            .unwrap();

        // 1000 → 1200, CASH_IN→CASH_IN: delta = +200
        let updated = repo
            .update(&company, &e1.id, patch(CashEntryType::CashIn, 1200))
            .await
            .unwrap();
        assert_eq!(updated.balance_kurus, 1200);

        let e2_after = repo.get_by_id(&company, &e2.id).await.unwrap().unwrap();
        assert_eq!(e2_after.balance_kurus, 900);

        assert_fold_consistent(&repo, &company).await;
    }

    #[tokio::test]
    async fn update_type_flip_applies_asymmetric_delta() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e1 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 100, day(1)))
            .await
            .unwrap();
        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 50, day(2)))
            .await
            .unwrap();
        assert_eq!(e2.balance_kurus, 150);

        // CASH_IN 100 → CASH_OUT 40: delta = -(100+40) = -140
        let updated = repo
            .update(&company, &e1.id, patch(CashEntryType::CashOut, 40))
            .await
            .unwrap();
        assert_eq!(updated.balance_kurus, 100 - 140);

        let e2_after = repo.get_by_id(&company, &e2.id).await.unwrap().unwrap();
        assert_eq!(e2_after.balance_kurus, 150 - 140);

        assert_fold_consistent(&repo, &company).await;
    }

    #[tokio::test]
    async fn update_does_not_touch_earlier_entries() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e1 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 300, day(5)))
            .await
            .unwrap();

        repo.update(&company, &e2.id, patch(CashEntryType::CashOut, 100))
            .await
            .unwrap();

        let e1_after = repo.get_by_id(&company, &e1.id).await.unwrap().unwrap();
        assert_eq!(e1_after.balance_kurus, 1000);
    }

    #[tokio::test]
    async fn delete_cash_in_lowers_later_balances() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e1 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 500, day(1)))
            .await
            .unwrap();
        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 100, day(3)))
            .await
            .unwrap();
        assert_eq!(e2.balance_kurus, 600);

        repo.delete(&company, &e1.id).await.unwrap();

        assert!(repo.get_by_id(&company, &e1.id).await.unwrap().is_none());
        let e2_after = repo.get_by_id(&company, &e2.id).await.unwrap().unwrap();
        assert_eq!(e2_after.balance_kurus, 100);

        assert_fold_consistent(&repo, &company).await;
    }

    #[tokio::test]
    async fn delete_cash_out_raises_later_balances() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        let e2 = repo
            .create(&company, &user, entry(CashEntryType::CashOut, 300, day(3)))
            .await
            .unwrap();
        let e3 = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 50, day(5)))
            .await
            .unwrap();
        assert_eq!(e3.balance_kurus, 750);

        repo.delete(&company, &e2.id).await.unwrap();

        let e3_after = repo.get_by_id(&company, &e3.id).await.unwrap().unwrap();
        assert_eq!(e3_after.balance_kurus, 1050);

        assert_fold_consistent(&repo, &company).await;
    }

    #[tokio::test]
    async fn update_and_delete_unknown_entry_fail_not_found() {
        let (db, company, _) = setup().await;
        let repo = db.cashbook();

        let err = repo
            .update(&company, "missing", patch(CashEntryType::CashIn, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.delete(&company, "missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn entries_are_invisible_across_companies() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        let e = repo
            .create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();

        let other_company = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?1, 'Other', ?2, ?2)",
        )
        .bind(&other_company)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        assert!(repo.get_by_id(&other_company, &e.id).await.unwrap().is_none());
        let err = repo.delete(&other_company, &e.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The entry is untouched under its own company.
        assert!(repo.get_by_id(&company, &e.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn balance_summary_counts_window_entries() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashIn, 400, day(5)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashOut, 150, day(5)))
            .await
            .unwrap();

        // Window covering only day 5.
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 6, 0, 0, 0).unwrap();
        let summary = repo.balance_summary(&company, start, end).await.unwrap();

        assert_eq!(summary.current_balance_kurus, 1250);
        assert_eq!(summary.today_income_kurus, 400);
        assert_eq!(summary.today_expense_kurus, 150);
        assert_eq!(summary.today_net_kurus, 250);
        assert_eq!(summary.today_entries, 2);

        // Idempotent read: no mutation in between, identical result.
        let again = repo.balance_summary(&company, start, end).await.unwrap();
        assert_eq!(summary, again);
    }

    #[tokio::test]
    async fn balance_summary_on_empty_book_is_zero() {
        let (db, company, _) = setup().await;
        let summary = db.cashbook().get_balance(&company).await.unwrap();
        assert_eq!(summary.current_balance_kurus, 0);
        assert_eq!(summary.today_entries, 0);
    }

    #[tokio::test]
    async fn stats_totals_by_type() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashIn, 500, day(2)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashOut, 300, day(3)))
            .await
            .unwrap();

        let stats = repo.stats(&company, None, None).await.unwrap();
        assert_eq!(stats.total_cash_in_kurus, 1500);
        assert_eq!(stats.total_cash_out_kurus, 300);
        assert_eq!(stats.net_cash_kurus, 1200);
        assert_eq!(stats.cash_in_count, 2);
        assert_eq!(stats.cash_out_count, 1);
        assert_eq!(stats.current_balance_kurus, 1200);
    }

    #[tokio::test]
    async fn list_filters_by_type_and_range() {
        let (db, company, user) = setup().await;
        let repo = db.cashbook();

        repo.create(&company, &user, entry(CashEntryType::CashIn, 1000, day(1)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashOut, 200, day(5)))
            .await
            .unwrap();
        repo.create(&company, &user, entry(CashEntryType::CashIn, 300, day(9)))
            .await
            .unwrap();

        let filter = CashBookFilter {
            entry_type: Some(CashEntryType::CashIn),
            start_date: Some(day(2)),
            end_date: Some(day(10)),
        };
        let entries = repo.list(&company, &filter).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount_kurus, 300);
    }
}
