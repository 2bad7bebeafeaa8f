//! Supplier repository. Mirrors the customer repository; suppliers are
//! the counterparty of purchase invoices and CASH_OUT entries.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::Supplier;

/// Fields for creating or replacing a supplier.
#[derive(Debug, Clone)]
pub struct SupplierInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn list(&self, company_id: &str, search: Option<&str>) -> DbResult<Vec<Supplier>> {
        let suppliers = match search {
            Some(term) => {
                sqlx::query_as::<_, Supplier>(
                    "SELECT * FROM suppliers \
                     WHERE company_id = ?1 AND is_active = 1 AND name LIKE ?2 COLLATE NOCASE \
                     ORDER BY name",
                )
                .bind(company_id)
                .bind(format!("%{term}%"))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Supplier>(
                    "SELECT * FROM suppliers \
                     WHERE company_id = ?1 AND is_active = 1 ORDER BY name",
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(suppliers)
    }

    pub async fn create(&self, company_id: &str, input: SupplierInput) -> DbResult<Supplier> {
        let now = Utc::now();
        let supplier = Supplier {
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
            "INSERT INTO suppliers (id, company_id, name, email, phone, address, tax_number, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)",
        )
        .bind(&supplier.id)
        .bind(&supplier.company_id)
        .bind(&supplier.name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(&supplier.tax_number)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn update(
        &self,
        company_id: &str,
        id: &str,
        input: SupplierInput,
    ) -> DbResult<Supplier> {
        let result = sqlx::query(
            "UPDATE suppliers SET name = ?1, email = ?2, phone = ?3, address = ?4, \
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
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    /// Soft-deletes a supplier.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = 0, updated_at = ?1 \
             WHERE id = ?2 AND company_id = ?3",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn create_and_soft_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?1, 'Test', ?2, ?2)",
        )
        .bind(&company)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        let repo = db.suppliers();
        let supplier = repo
            .create(
                &company,
                SupplierInput {
                    name: "Anadolu Toptan".to_string(),
                    email: Some("satis@anadolu.example".to_string()),
                    phone: None,
                    address: None,
                    tax_number: Some("1234567890".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(repo.list(&company, None).await.unwrap().len(), 1);
        repo.delete(&company, &supplier.id).await.unwrap();
        assert!(repo.list(&company, None).await.unwrap().is_empty());
    }
}
