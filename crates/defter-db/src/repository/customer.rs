//! Customer repository: master-data CRUD, company-scoped.
//!
//! Deletion is a soft delete (`is_active = 0`) so historical invoices and
//! ledger entries keep a resolvable counterparty.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::Customer;

/// Fields for creating or replacing a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists active customers, optionally filtered by a case-insensitive
    /// name search.
    pub async fn list(&self, company_id: &str, search: Option<&str>) -> DbResult<Vec<Customer>> {
        let customers = match search {
            Some(term) => {
                sqlx::query_as::<_, Customer>(
                    "SELECT * FROM customers \
                     WHERE company_id = ?1 AND is_active = 1 AND name LIKE ?2 COLLATE NOCASE \
                     ORDER BY name",
                )
                .bind(company_id)
                .bind(format!("%{term}%"))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Customer>(
                    "SELECT * FROM customers \
                     WHERE company_id = ?1 AND is_active = 1 ORDER BY name",
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(customers)
    }

    pub async fn create(&self, company_id: &str, input: CustomerInput) -> DbResult<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            tax_number: input.tax_number,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO customers (id, company_id, name, email, phone, address, tax_number, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)",
        )
        .bind(&customer.id)
        .bind(&customer.company_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.tax_number)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn update(
        &self,
        company_id: &str,
        id: &str,
        input: CustomerInput,
    ) -> DbResult<Customer> {
        let result = sqlx::query(
            "UPDATE customers SET name = ?1, email = ?2, phone = ?3, address = ?4, \
             tax_number = ?5, updated_at = ?6 \
             WHERE id = ?7 AND company_id = ?8",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.tax_number)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Soft-deletes a customer.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET is_active = 0, updated_at = ?1 \
             WHERE id = ?2 AND company_id = ?3",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?1, 'Test', ?2, ?2)",
        )
        .bind(&company_id)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();
        (db, company_id)
    }

    fn input(name: &str) -> CustomerInput {
        CustomerInput {
            name: name.to_string(),
            email: None,
            phone: None,
            address: None,
            tax_number: None,
        }
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let (db, company) = setup().await;
        let repo = db.customers();

        let created = repo.create(&company, input("Ayşe Ticaret")).await.unwrap();
        assert!(created.is_active);

        let mut patch = input("Ayşe Ltd");
        patch.phone = Some("05551234567".to_string());
        let updated = repo.update(&company, &created.id, patch).await.unwrap();
        assert_eq!(updated.name, "Ayşe Ltd");
        assert_eq!(updated.phone.as_deref(), Some("05551234567"));

        repo.delete(&company, &created.id).await.unwrap();
        let listed = repo.list(&company, None).await.unwrap();
        assert!(listed.is_empty(), "soft-deleted customers leave the list");

        // Still fetchable by id for historical references.
        let fetched = repo.get_by_id(&company, &created.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn search_filters_by_name() {
        let (db, company) = setup().await;
        let repo = db.customers();

        repo.create(&company, input("Mehmet Gıda")).await.unwrap();
        repo.create(&company, input("Zeynep İnşaat")).await.unwrap();

        let hits = repo.list(&company, Some("mehmet")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Mehmet Gıda");
    }

    #[tokio::test]
    async fn update_unknown_customer_fails() {
        let (db, company) = setup().await;
        let err = db
            .customers()
            .update(&company, "missing", input("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
