//! # Invoice Repository
//!
//! Invoices with line items, server-side totals and stock coupling.
//!
//! ## Stock Coupling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  SALE invoice      create → stock -= qty      delete → stock += qty │
//! │  PURCHASE invoice  create → stock += qty      delete → stock -= qty │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! Invoice rows, item rows and every stock move share one transaction;
//! an insufficient-stock failure on any line rolls the whole invoice
//! back.
//!
//! ## Totals
//! Line totals, subtotal, tax and total are always computed here from
//! the items. Client-supplied totals are ignored. Unit prices are frozen
//! at invoice time.
//!
//! PAID invoices are immutable: no status change, no deletion.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use defter_core::{
    CoreError, Invoice, InvoiceItem, InvoiceStatus, InvoiceStatusStat, InvoiceType, Money,
};

/// One requested line of a new invoice. When `unit_price_kurus` is not
/// given, the product's current price is frozen in.
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_kurus: Option<i64>,
}

/// Data for a new invoice. Totals are derived, never accepted.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub invoice_type: InvoiceType,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    /// Tax rate in basis points (2000 = 20% KDV).
    pub tax_rate_bps: u32,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub items: Vec<NewInvoiceItem>,
}

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    pub async fn get_by_id(&self, company_id: &str, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE id = ?1 AND company_id = ?2",
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Fetches an invoice together with its items.
    pub async fn get_with_items(
        &self,
        company_id: &str,
        id: &str,
    ) -> DbResult<Option<(Invoice, Vec<InvoiceItem>)>> {
        let Some(invoice) = self.get_by_id(company_id, id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT * FROM invoice_items WHERE invoice_id = ?1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some((invoice, items)))
    }

    /// Lists invoices, optionally filtered by type and status, newest
    /// issue date first.
    pub async fn list(
        &self,
        company_id: &str,
        invoice_type: Option<InvoiceType>,
        status: Option<InvoiceStatus>,
    ) -> DbResult<Vec<Invoice>> {
        let mut sql = String::from("SELECT * FROM invoices WHERE company_id = ?");
        if invoice_type.is_some() {
            sql.push_str(" AND invoice_type = ?");
        }
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY issue_date DESC, created_at DESC");

        let mut query = sqlx::query_as::<_, Invoice>(&sql).bind(company_id);
        if let Some(invoice_type) = invoice_type {
            query = query.bind(invoice_type);
        }
        if let Some(status) = status {
            query = query.bind(status);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Creates an invoice with its items and applies the stock coupling,
    /// all in one transaction.
    pub async fn create(
        &self,
        company_id: &str,
        new_invoice: NewInvoice,
    ) -> DbResult<(Invoice, Vec<InvoiceItem>)> {
        if new_invoice.items.is_empty() {
            return Err(DbError::Domain(CoreError::Validation(
                defter_core::ValidationError::Required {
                    field: "items".to_string(),
                },
            )));
        }

        let invoice_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let mut items = Vec::with_capacity(new_invoice.items.len());
        let mut subtotal = Money::zero();

        for line in &new_invoice.items {
            let stock_delta = match new_invoice.invoice_type {
                InvoiceType::Sale => -line.quantity,
                InvoiceType::Purchase => line.quantity,
            };
            let product = ProductRepository::adjust_stock_in_tx(
                &mut tx,
                company_id,
                &line.product_id,
                stock_delta,
            )
            .await?;

            let unit_price = line.unit_price_kurus.unwrap_or(product.price_kurus);
            let line_total = Money::from_kurus(unit_price).multiply_quantity(line.quantity);
            subtotal += line_total;

            items.push(InvoiceItem {
                id: Uuid::new_v4().to_string(),
                invoice_id: invoice_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price_kurus: unit_price,
                line_total_kurus: line_total.kurus(),
            });
        }

        let tax = subtotal.tax_at_bps(new_invoice.tax_rate_bps);
        let total = subtotal + tax;

        let invoice = Invoice {
            id: invoice_id,
            company_id: company_id.to_string(),
            invoice_number: new_invoice.invoice_number,
            invoice_type: new_invoice.invoice_type,
            status: InvoiceStatus::Pending,
            customer_id: new_invoice.customer_id,
            supplier_id: new_invoice.supplier_id,
            subtotal_kurus: subtotal.kurus(),
            tax_rate_bps: new_invoice.tax_rate_bps,
            tax_amount_kurus: tax.kurus(),
            total_kurus: total.kurus(),
            issue_date: new_invoice.issue_date,
            due_date: new_invoice.due_date,
            notes: new_invoice.notes,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %invoice.id,
            company_id,
            number = %invoice.invoice_number,
            total = %total,
            "Creating invoice"
        );

        sqlx::query(
            "INSERT INTO invoices (id, company_id, invoice_number, invoice_type, status, \
                customer_id, supplier_id, subtotal_kurus, tax_rate_bps, tax_amount_kurus, \
                total_kurus, issue_date, due_date, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .bind(&invoice.id)
        .bind(&invoice.company_id)
        .bind(&invoice.invoice_number)
        .bind(invoice.invoice_type)
        .bind(invoice.status)
        .bind(&invoice.customer_id)
        .bind(&invoice.supplier_id)
        .bind(invoice.subtotal_kurus)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_amount_kurus)
        .bind(invoice.total_kurus)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                "INSERT INTO invoice_items (id, invoice_id, product_id, quantity, \
                    unit_price_kurus, line_total_kurus) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_kurus)
            .bind(item.line_total_kurus)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok((invoice, items))
    }

    /// Changes an invoice's lifecycle status. A PAID invoice cannot
    /// leave the PAID state.
    pub async fn update_status(
        &self,
        company_id: &str,
        id: &str,
        status: InvoiceStatus,
    ) -> DbResult<Invoice> {
        let invoice = self
            .get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))?;

        if invoice.status == InvoiceStatus::Paid && status != InvoiceStatus::Paid {
            return Err(DbError::Domain(CoreError::InvoicePaid(invoice.id)));
        }

        sqlx::query(
            "UPDATE invoices SET status = ?1, updated_at = ?2 WHERE id = ?3 AND company_id = ?4",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Deletes an invoice and reverses its stock coupling in one
    /// transaction. PAID invoices cannot be deleted.
    pub async fn delete(&self, company_id: &str, id: &str) -> DbResult<()> {
        let (invoice, items) = self
            .get_with_items(company_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))?;

        if invoice.status == InvoiceStatus::Paid {
            return Err(DbError::Domain(CoreError::InvoicePaid(invoice.id)));
        }

        debug!(id, company_id, "Deleting invoice with stock reversal");

        let mut tx = self.pool.begin().await?;

        for item in &items {
            let stock_delta = match invoice.invoice_type {
                InvoiceType::Sale => item.quantity,
                InvoiceType::Purchase => -item.quantity,
            };
            ProductRepository::adjust_stock_in_tx(&mut tx, company_id, &item.product_id, stock_delta)
                .await?;
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM invoices WHERE id = ?1 AND company_id = ?2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count and total per status.
    pub async fn stats(&self, company_id: &str) -> DbResult<Vec<InvoiceStatusStat>> {
        let rows: Vec<(InvoiceStatus, i64, i64)> = sqlx::query_as(
            "SELECT status, COUNT(id), COALESCE(SUM(total_kurus), 0) \
             FROM invoices WHERE company_id = ?1 GROUP BY status",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(status, count, total_kurus)| InvoiceStatusStat {
                status,
                count,
                total_kurus,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductInput;

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

    async fn make_product(db: &Database, company: &str, stock: i64, price: i64) -> String {
        db.products()
            .create(
                company,
                ProductInput {
                    name: format!("Ürün {}", Uuid::new_v4()),
                    description: None,
                    price_kurus: price,
                    cost_kurus: None,
                    barcode: None,
                    category: None,
                    unit: "adet".to_string(),
                    stock,
                    min_stock: 0,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn sale(number: &str, items: Vec<NewInvoiceItem>) -> NewInvoice {
        NewInvoice {
            invoice_number: number.to_string(),
            invoice_type: InvoiceType::Sale,
            customer_id: None,
            supplier_id: None,
            tax_rate_bps: 2000,
            issue_date: Utc::now(),
            due_date: None,
            notes: None,
            items,
        }
    }

    fn line(product_id: &str, quantity: i64) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id: product_id.to_string(),
            quantity,
            unit_price_kurus: None,
        }
    }

    #[tokio::test]
    async fn sale_invoice_computes_totals_and_decrements_stock() {
        let (db, company) = setup().await;
        let product = make_product(&db, &company, 10, 1000).await;

        let (invoice, items) = db
            .invoices()
            .create(&company, sale("INV-001", vec![line(&product, 3)]))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_total_kurus, 3000);
        assert_eq!(invoice.subtotal_kurus, 3000);
        // 20% KDV
        assert_eq!(invoice.tax_amount_kurus, 600);
        assert_eq!(invoice.total_kurus, 3600);
        assert_eq!(invoice.status, InvoiceStatus::Pending);

        let stock = db
            .products()
            .get_by_id(&company, &product)
            .await
            .unwrap()
            .unwrap()
            .stock;
        assert_eq!(stock, 7);
    }

    #[tokio::test]
    async fn purchase_invoice_increments_stock() {
        let (db, company) = setup().await;
        let product = make_product(&db, &company, 2, 1000).await;

        let mut invoice = sale("INV-002", vec![line(&product, 5)]);
        invoice.invoice_type = InvoiceType::Purchase;
        db.invoices().create(&company, invoice).await.unwrap();

        let stock = db
            .products()
            .get_by_id(&company, &product)
            .await
            .unwrap()
            .unwrap()
            .stock;
        assert_eq!(stock, 7);
    }

    #[tokio::test]
    async fn insufficient_stock_rolls_back_whole_invoice() {
        let (db, company) = setup().await;
        let plenty = make_product(&db, &company, 100, 500).await;
        let scarce = make_product(&db, &company, 1, 500).await;

        let err = db
            .invoices()
            .create(
                &company,
                sale("INV-003", vec![line(&plenty, 10), line(&scarce, 5)]),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        // First line's stock move must have been rolled back too.
        let stock = db
            .products()
            .get_by_id(&company, &plenty)
            .await
            .unwrap()
            .unwrap()
            .stock;
        assert_eq!(stock, 100);
        assert!(db.invoices().list(&company, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_reverses_stock_and_paid_is_immutable() {
        let (db, company) = setup().await;
        let product = make_product(&db, &company, 10, 1000).await;
        let repo = db.invoices();

        let (invoice, _) = repo
            .create(&company, sale("INV-004", vec![line(&product, 4)]))
            .await
            .unwrap();

        let paid = repo
            .update_status(&company, &invoice.id, InvoiceStatus::Paid)
            .await
            .unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);

        // Paid invoices can be neither re-statused nor deleted.
        let err = repo
            .update_status(&company, &invoice.id, InvoiceStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvoicePaid(_))));
        let err = repo.delete(&company, &invoice.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvoicePaid(_))));

        // A pending invoice deletes cleanly and restores stock.
        let (pending, _) = repo
            .create(&company, sale("INV-005", vec![line(&product, 2)]))
            .await
            .unwrap();
        repo.delete(&company, &pending.id).await.unwrap();
        let stock = db
            .products()
            .get_by_id(&company, &product)
            .await
            .unwrap()
            .unwrap()
            .stock;
        assert_eq!(stock, 6); // 10 - 4 (paid sale) - 2 + 2
    }

    #[tokio::test]
    async fn duplicate_invoice_number_is_rejected() {
        let (db, company) = setup().await;
        let product = make_product(&db, &company, 100, 1000).await;
        let repo = db.invoices();

        repo.create(&company, sale("INV-006", vec![line(&product, 1)]))
            .await
            .unwrap();
        let err = repo
            .create(&company, sale("INV-006", vec![line(&product, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn stats_groups_by_status() {
        let (db, company) = setup().await;
        let product = make_product(&db, &company, 100, 1000).await;
        let repo = db.invoices();

        let (a, _) = repo
            .create(&company, sale("INV-007", vec![line(&product, 1)]))
            .await
            .unwrap();
        repo.create(&company, sale("INV-008", vec![line(&product, 2)]))
            .await
            .unwrap();
        repo.update_status(&company, &a.id, InvoiceStatus::Paid)
            .await
            .unwrap();

        let stats = repo.stats(&company).await.unwrap();
        let paid = stats.iter().find(|s| s.status == InvoiceStatus::Paid).unwrap();
        let pending = stats
            .iter()
            .find(|s| s.status == InvoiceStatus::Pending)
            .unwrap();
        assert_eq!(paid.count, 1);
        assert_eq!(paid.total_kurus, 1200);
        assert_eq!(pending.count, 1);
        assert_eq!(pending.total_kurus, 2400);
    }
}
