//! Invoice endpoints. Totals come back computed by the repository;
//! client-supplied totals are never accepted.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use defter_core::validation::validate_quantity;
use defter_core::{InvoiceStatus, InvoiceType};
use defter_db::{DbError, NewInvoice, NewInvoiceItem};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats", get(stats))
        .route("/{id}", get(get_invoice).delete(delete))
        .route("/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
struct InvoiceItemRequest {
    product_id: String,
    quantity: i64,
    unit_price_kurus: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateInvoiceRequest {
    invoice_number: String,
    #[serde(rename = "type")]
    invoice_type: InvoiceType,
    customer_id: Option<String>,
    supplier_id: Option<String>,
    #[serde(default)]
    tax_rate_bps: u32,
    issue_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: InvoiceStatus,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    invoice_type: Option<InvoiceType>,
    status: Option<InvoiceStatus>,
}

async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let invoices = state
        .db
        .invoices()
        .list(auth.company()?, query.invoice_type, query.status)
        .await?;
    Ok(ok(invoices))
}

async fn get_invoice(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let (invoice, items) = state
        .db
        .invoices()
        .get_with_items(auth.company()?, &id)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", &id))?;
    Ok(ok(json!({ "invoice": invoice, "items": items })))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateInvoiceRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.invoice_number.trim().is_empty() {
        return Err(ApiError::BadRequest("invoice_number is required".to_string()));
    }
    for item in &req.items {
        validate_quantity(item.quantity)?;
    }

    let (invoice, items) = state
        .db
        .invoices()
        .create(
            auth.company()?,
            NewInvoice {
                invoice_number: req.invoice_number,
                invoice_type: req.invoice_type,
                customer_id: req.customer_id,
                supplier_id: req.supplier_id,
                tax_rate_bps: req.tax_rate_bps,
                issue_date: req.issue_date.unwrap_or_else(Utc::now),
                due_date: req.due_date,
                notes: req.notes,
                items: req
                    .items
                    .into_iter()
                    .map(|i| NewInvoiceItem {
                        product_id: i.product_id,
                        quantity: i.quantity,
                        unit_price_kurus: i.unit_price_kurus,
                    })
                    .collect(),
            },
        )
        .await?;

    info!(invoice_id = %invoice.id, number = %invoice.invoice_number, "Invoice created");
    Ok(ok_message(
        "Invoice created",
        json!({ "invoice": invoice, "items": items }),
    ))
}

async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let invoice = state
        .db
        .invoices()
        .update_status(auth.company()?, &id, req.status)
        .await?;

    info!(invoice_id = %id, status = ?req.status, "Invoice status changed");
    Ok(ok_message("Invoice status updated", invoice))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.invoices().delete(auth.company()?, &id).await?;
    info!(invoice_id = %id, "Invoice deleted");
    Ok(ok_message("Invoice deleted", serde_json::Value::Null))
}

async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let stats = state.db.invoices().stats(auth.company()?).await?;
    Ok(ok(stats))
}
