//! # Product Repository
//!
//! Product master data, stock levels and the low-stock listing.
//!
//! Stock changes go through [`ProductRepository::adjust_stock`], which
//! guards against driving stock negative. Invoice creation and deletion
//! apply their stock coupling through the same guard inside their own
//! transaction.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::{CoreError, Product};

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price_kurus: i64,
    pub cost_kurus: Option<i64>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub stock: i64,
    pub min_stock: i64,
}

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products, optionally filtered by name or barcode.
    pub async fn list(&self, company_id: &str, search: Option<&str>) -> DbResult<Vec<Product>> {
        let products = match search {
            Some(term) => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products \
                     WHERE company_id = ?1 AND is_active = 1 \
                       AND (name LIKE ?2 COLLATE NOCASE OR barcode = ?3) \
                     ORDER BY name",
                )
                .bind(company_id)
                .bind(format!("%{term}%"))
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products \
                     WHERE company_id = ?1 AND is_active = 1 ORDER BY name",
                )
                .bind(company_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Products at or below their reorder threshold.
    pub async fn low_stock(&self, company_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products \
             WHERE company_id = ?1 AND is_active = 1 AND stock <= min_stock \
             ORDER BY stock ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn create(&self, company_id: &str, input: ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: input.name,
            description: input.description,
            price_kurus: input.price_kurus,
            cost_kurus: input.cost_kurus,
            barcode: input.barcode,
            category: input.category,
            unit: input.unit,
            stock: input.stock,
            min_stock: input.min_stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO products (id, company_id, name, description, price_kurus, cost_kurus, \
                barcode, category, unit, stock, min_stock, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?13)",
        )
        .bind(&product.id)
        .bind(&product.company_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_kurus)
        .bind(product.cost_kurus)
        .bind(&product.barcode)
        .bind(&product.category)
        .bind(&product.unit)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn update(
        &self,
        company_id: &str,
        id: &str,
        input: ProductInput,
    ) -> DbResult<Product> {
        let result = sqlx::query(
            "UPDATE products SET name = ?1, description = ?2, price_kurus = ?3, cost_kurus = ?4, \
                barcode = ?5, category = ?6, unit = ?7, stock = ?8, min_stock = ?9, updated_at = ?10 \
             WHERE id = ?11 AND company_id = ?12",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_kurus)
        .bind(input.cost_kurus)
        .bind(&input.barcode)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Soft-deletes a product.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?1 \
             WHERE id = ?2 AND company_id = ?3",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Adjusts stock by a signed delta (positive receives, negative
    /// issues). Fails with `InsufficientStock` rather than going negative.
    pub async fn adjust_stock(&self, company_id: &str, id: &str, delta: i64) -> DbResult<Product> {
        let mut tx = self.pool.begin().await?;
        let product = Self::adjust_stock_in_tx(&mut tx, company_id, id, delta).await?;
        tx.commit().await?;
        Ok(product)
    }

    /// Stock adjustment inside a caller-owned transaction, used by the
    /// invoice repository to couple stock moves with invoice writes.
    pub(crate) async fn adjust_stock_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        company_id: &str,
        id: &str,
        delta: i64,
    ) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        let new_stock = product.stock + delta;
        if new_stock < 0 {
            return Err(DbError::Domain(CoreError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
                requested: -delta,
            }));
        }

        debug!(id, company_id, delta, new_stock, "Adjusting product stock");

        sqlx::query(
            "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3 AND company_id = ?4",
        )
        .bind(new_stock)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&mut **tx)
        .await?;

        Ok(Product {
            stock: new_stock,
            ..product
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> (Database, String) {
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
        (db, company)
    }

    fn input(name: &str, stock: i64, min_stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: None,
            price_kurus: 1500,
            cost_kurus: Some(900),
            barcode: None,
            category: None,
            unit: "adet".to_string(),
            stock,
            min_stock,
        }
    }

    #[tokio::test]
    async fn low_stock_lists_only_depleted_products() {
        let (db, company) = setup().await;
        let repo = db.products();

        repo.create(&company, input("Kalem", 50, 10)).await.unwrap();
        let low = repo.create(&company, input("Defter", 3, 5)).await.unwrap();

        let listed = repo.low_stock(&company).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, low.id);
    }

    #[tokio::test]
    async fn adjust_stock_guards_against_negative() {
        let (db, company) = setup().await;
        let repo = db.products();

        let product = repo.create(&company, input("Silgi", 4, 0)).await.unwrap();

        let adjusted = repo.adjust_stock(&company, &product.id, -3).await.unwrap();
        assert_eq!(adjusted.stock, 1);

        let err = repo.adjust_stock(&company, &product.id, -2).await.unwrap_err();
        match err {
            DbError::Domain(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Failed adjustment leaves the stock untouched.
        let fetched = repo.get_by_id(&company, &product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 1);
    }

    #[tokio::test]
    async fn search_matches_barcode_exactly() {
        let (db, company) = setup().await;
        let repo = db.products();

        let mut with_barcode = input("Su 0.5L", 100, 10);
        with_barcode.barcode = Some("8690000000001".to_string());
        repo.create(&company, with_barcode).await.unwrap();
        repo.create(&company, input("Su 1.5L", 80, 10)).await.unwrap();

        let hits = repo.list(&company, Some("8690000000001")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Su 0.5L");
    }
}
