//! Cash-book endpoints.
//!
//! The handlers validate input and delegate to the cash-book repository,
//! which owns all balance computation and propagation. Success responses
//! return the stored entry, including its computed running balance.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use defter_core::validation::{validate_amount, validate_name};
use defter_core::{CashEntryType, Money};
use defter_db::{CashBookEntryPatch, CashBookFilter, NewCashBookEntry};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/balance", get(balance))
        .route("/stats", get(stats))
        .route("/{id}", get(get_entry).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct CreateEntryRequest {
    #[serde(rename = "type")]
    entry_type: CashEntryType,
    amount_kurus: i64,
    description: String,
    /// Effective date; defaults to now when omitted.
    date: Option<DateTime<Utc>>,
    category: Option<String>,
    reference: Option<String>,
    notes: Option<String>,
    customer_id: Option<String>,
    supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateEntryRequest {
    #[serde(rename = "type")]
    entry_type: CashEntryType,
    amount_kurus: i64,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
    category: Option<String>,
    reference: Option<String>,
    notes: Option<String>,
    customer_id: Option<String>,
    supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    entry_type: Option<CashEntryType>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let filter = CashBookFilter {
        entry_type: query.entry_type,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let entries = state.db.cashbook().list(auth.company()?, &filter).await?;
    Ok(ok(entries))
}

async fn get_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let entry = state
        .db
        .cashbook()
        .get_by_id(auth.company()?, &id)
        .await?
        .ok_or_else(|| defter_db::DbError::not_found("Cash book entry", &id))?;
    Ok(ok(entry))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEntryRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let amount = Money::from_kurus(req.amount_kurus);
    validate_amount("amount", amount)?;
    validate_name("description", &req.description)?;

    let entry = state
        .db
        .cashbook()
        .create(
            auth.company()?,
            &auth.user_id,
            NewCashBookEntry {
                entry_type: req.entry_type,
                amount,
                description: req.description,
                date: req.date.unwrap_or_else(Utc::now),
                category: req.category,
                reference: req.reference,
                notes: req.notes,
                customer_id: req.customer_id,
                supplier_id: req.supplier_id,
            },
        )
        .await?;

    info!(entry_id = %entry.id, "Cash book entry created");
    Ok(ok_message("Entry created", entry))
}

async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntryRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let amount = Money::from_kurus(req.amount_kurus);
    validate_amount("amount", amount)?;
    if let Some(description) = &req.description {
        validate_name("description", description)?;
    }

    let entry = state
        .db
        .cashbook()
        .update(
            auth.company()?,
            &id,
            CashBookEntryPatch {
                entry_type: req.entry_type,
                amount,
                description: req.description,
                date: req.date,
                category: req.category,
                reference: req.reference,
                notes: req.notes,
                customer_id: req.customer_id,
                supplier_id: req.supplier_id,
            },
        )
        .await?;

    info!(entry_id = %entry.id, "Cash book entry updated");
    Ok(ok_message("Entry updated", entry))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.cashbook().delete(auth.company()?, &id).await?;
    info!(entry_id = %id, "Cash book entry deleted");
    Ok(ok_message("Entry deleted", serde_json::Value::Null))
}

async fn balance(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let summary = state.db.cashbook().get_balance(auth.company()?).await?;
    Ok(ok(summary))
}

async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let stats = state
        .db
        .cashbook()
        .stats(auth.company()?, query.start_date, query.end_date)
        .await?;
    Ok(ok(stats))
}
