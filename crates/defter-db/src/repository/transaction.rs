//! # Transaction Repository
//!
//! General income/expense records with aggregate and monthly statistics.
//!
//! Unlike the cash book, transactions carry no running balance, so
//! create/update/delete are plain row operations with no propagation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::{MonthlyStat, Transaction, TransactionStats, TransactionType};

/// Fields for creating or replacing a transaction.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub tx_type: TransactionType,
    pub amount_kurus: i64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: Option<String>,
    pub reference: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
}

/// Optional filters for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub tx_type: Option<TransactionType>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    pub async fn list(
        &self,
        company_id: &str,
        filter: &TransactionFilter,
    ) -> DbResult<Vec<Transaction>> {
        let mut sql = String::from("SELECT * FROM transactions WHERE company_id = ?");
        if filter.tx_type.is_some() {
            sql.push_str(" AND tx_type = ?");
        }
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.start_date.is_some() && filter.end_date.is_some() {
            sql.push_str(" AND date >= ? AND date <= ?");
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC");

        let mut query = sqlx::query_as::<_, Transaction>(&sql).bind(company_id);
        if let Some(tx_type) = filter.tx_type {
            query = query.bind(tx_type);
        }
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            query = query.bind(start).bind(end);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn create(
        &self,
        company_id: &str,
        user_id: &str,
        input: TransactionInput,
    ) -> DbResult<Transaction> {
        let now = Utc::now();
        let tx = Transaction {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            user_id: user_id.to_string(),
            tx_type: input.tx_type,
            amount_kurus: input.amount_kurus,
            description: input.description,
            date: input.date,
            category: input.category,
            reference: input.reference,
            customer_id: input.customer_id,
            supplier_id: input.supplier_id,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO transactions (id, company_id, user_id, tx_type, amount_kurus, description, \
                date, category, reference, customer_id, supplier_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&tx.id)
        .bind(&tx.company_id)
        .bind(&tx.user_id)
        .bind(tx.tx_type)
        .bind(tx.amount_kurus)
        .bind(&tx.description)
        .bind(tx.date)
        .bind(&tx.category)
        .bind(&tx.reference)
        .bind(&tx.customer_id)
        .bind(&tx.supplier_id)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(tx)
    }

    pub async fn update(
        &self,
        company_id: &str,
        id: &str,
        input: TransactionInput,
    ) -> DbResult<Transaction> {
        let result = sqlx::query(
            "UPDATE transactions SET tx_type = ?1, amount_kurus = ?2, description = ?3, \
                date = ?4, category = ?5, reference = ?6, customer_id = ?7, supplier_id = ?8, \
                updated_at = ?9 \
             WHERE id = ?10 AND company_id = ?11",
        )
        .bind(input.tx_type)
        .bind(input.amount_kurus)
        .bind(&input.description)
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.reference)
        .bind(&input.customer_id)
        .bind(&input.supplier_id)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1 AND company_id = ?2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }

    /// Totals by type over an optional inclusive date range.
    pub async fn stats(
        &self,
        company_id: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DbResult<TransactionStats> {
        let mut sql = String::from(
            "SELECT tx_type, COALESCE(SUM(amount_kurus), 0), COUNT(id) \
             FROM transactions WHERE company_id = ?",
        );
        if start_date.is_some() && end_date.is_some() {
            sql.push_str(" AND date >= ? AND date <= ?");
        }
        sql.push_str(" GROUP BY tx_type");

        let mut query = sqlx::query_as::<_, (TransactionType, i64, i64)>(&sql).bind(company_id);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            query = query.bind(start).bind(end);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut stats = TransactionStats {
            total_income_kurus: 0,
            total_expense_kurus: 0,
            net_income_kurus: 0,
            income_count: 0,
            expense_count: 0,
        };
        for (tx_type, total, count) in rows {
            match tx_type {
                TransactionType::Income => {
                    stats.total_income_kurus = total;
                    stats.income_count = count;
                }
                TransactionType::Expense => {
                    stats.total_expense_kurus = total;
                    stats.expense_count = count;
                }
            }
        }
        stats.net_income_kurus = stats.total_income_kurus - stats.total_expense_kurus;

        Ok(stats)
    }

    /// Income/expense totals bucketed per calendar month of one year.
    /// Months with no activity are included with zero totals.
    pub async fn monthly_stats(&self, company_id: &str, year: i32) -> DbResult<Vec<MonthlyStat>> {
        // Dates are RFC3339 TEXT, so strftime can bucket them directly.
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT strftime('%m', date), tx_type, COALESCE(SUM(amount_kurus), 0) \
             FROM transactions \
             WHERE company_id = ?1 AND strftime('%Y', date) = ?2 \
             GROUP BY strftime('%m', date), tx_type",
        )
        .bind(company_id)
        .bind(format!("{year:04}"))
        .fetch_all(&self.pool)
        .await?;

        let mut months: Vec<MonthlyStat> = (1..=12)
            .map(|month| MonthlyStat {
                month,
                income_kurus: 0,
                expense_kurus: 0,
                net_kurus: 0,
            })
            .collect();

        for (month_str, tx_type, total) in rows {
            let Ok(month) = month_str.parse::<u32>() else {
                continue;
            };
            if !(1..=12).contains(&month) {
                continue;
            }
            let bucket = &mut months[(month - 1) as usize];
            match tx_type.as_str() {
                "INCOME" => bucket.income_kurus = total,
                "EXPENSE" => bucket.expense_kurus = total,
                _ => {}
            }
        }
        for bucket in &mut months {
            bucket.net_kurus = bucket.income_kurus - bucket.expense_kurus;
        }

        Ok(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;

    async fn setup() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company = Uuid::new_v4().to_string();
        let user = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?1, 'Test', ?2, ?2)",
        )
        .bind(&company)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, company_id, is_active, created_at, updated_at) \
             VALUES (?1, ?2, 'x', 'T', 'U', 'ADMIN', ?3, 1, ?4, ?4)",
        )
        .bind(&user)
        .bind(format!("{}@test.com", Uuid::new_v4()))
        .bind(&company)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();
        (db, company, user)
    }

    fn input(tx_type: TransactionType, amount: i64, date: DateTime<Utc>) -> TransactionInput {
        TransactionInput {
            tx_type,
            amount_kurus: amount,
            description: "test".to_string(),
            date,
            category: None,
            reference: None,
            customer_id: None,
            supplier_id: None,
        }
    }

    #[tokio::test]
    async fn stats_totals_by_type() {
        let (db, company, user) = setup().await;
        let repo = db.transactions();
        let d = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

        repo.create(&company, &user, input(TransactionType::Income, 5000, d))
            .await
            .unwrap();
        repo.create(&company, &user, input(TransactionType::Income, 2500, d))
            .await
            .unwrap();
        repo.create(&company, &user, input(TransactionType::Expense, 1000, d))
            .await
            .unwrap();

        let stats = repo.stats(&company, None, None).await.unwrap();
        assert_eq!(stats.total_income_kurus, 7500);
        assert_eq!(stats.total_expense_kurus, 1000);
        assert_eq!(stats.net_income_kurus, 6500);
        assert_eq!(stats.income_count, 2);
        assert_eq!(stats.expense_count, 1);
    }

    #[tokio::test]
    async fn monthly_stats_buckets_by_month_with_gaps() {
        let (db, company, user) = setup().await;
        let repo = db.transactions();

        let january = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let march = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let other_year = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();

        repo.create(&company, &user, input(TransactionType::Income, 1000, january))
            .await
            .unwrap();
        repo.create(&company, &user, input(TransactionType::Expense, 400, march))
            .await
            .unwrap();
        repo.create(&company, &user, input(TransactionType::Income, 9999, other_year))
            .await
            .unwrap();

        let months = repo.monthly_stats(&company, 2026).await.unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].income_kurus, 1000);
        assert_eq!(months[0].net_kurus, 1000);
        assert_eq!(months[1].income_kurus, 0);
        assert_eq!(months[2].expense_kurus, 400);
        assert_eq!(months[2].net_kurus, -400);
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let (db, company, user) = setup().await;
        let repo = db.transactions();
        let d = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let mut rent = input(TransactionType::Expense, 15000, d);
        rent.category = Some("kira".to_string());
        repo.create(&company, &user, rent).await.unwrap();
        repo.create(&company, &user, input(TransactionType::Expense, 500, d))
            .await
            .unwrap();

        let filter = TransactionFilter {
            category: Some("kira".to_string()),
            ..Default::default()
        };
        let hits = repo.list(&company, &filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].amount_kurus, 15000);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let (db, company, user) = setup().await;
        let repo = db.transactions();
        let d = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let tx = repo
            .create(&company, &user, input(TransactionType::Income, 100, d))
            .await
            .unwrap();

        let updated = repo
            .update(&company, &tx.id, input(TransactionType::Expense, 250, d))
            .await
            .unwrap();
        assert_eq!(updated.tx_type, TransactionType::Expense);
        assert_eq!(updated.amount_kurus, 250);

        repo.delete(&company, &tx.id).await.unwrap();
        assert!(repo.get_by_id(&company, &tx.id).await.unwrap().is_none());
    }
}
