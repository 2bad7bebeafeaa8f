//! General transaction endpoints, with aggregate and monthly statistics.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;

use defter_core::validation::{validate_amount, validate_name};
use defter_core::{Money, TransactionType};
use defter_db::{DbError, TransactionFilter, TransactionInput};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats", get(stats))
        .route("/stats/monthly", get(monthly_stats))
        .route("/{id}", get(get_transaction).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct TransactionRequest {
    #[serde(rename = "type")]
    tx_type: TransactionType,
    amount_kurus: i64,
    description: String,
    date: Option<DateTime<Utc>>,
    category: Option<String>,
    reference: Option<String>,
    customer_id: Option<String>,
    supplier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    tx_type: Option<TransactionType>,
    category: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

impl TransactionRequest {
    fn into_input(self) -> ApiResult<TransactionInput> {
        validate_amount("amount", Money::from_kurus(self.amount_kurus))?;
        validate_name("description", &self.description)?;
        Ok(TransactionInput {
            tx_type: self.tx_type,
            amount_kurus: self.amount_kurus,
            description: self.description,
            date: self.date.unwrap_or_else(Utc::now),
            category: self.category,
            reference: self.reference,
            customer_id: self.customer_id,
            supplier_id: self.supplier_id,
        })
    }
}

async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let filter = TransactionFilter {
        tx_type: query.tx_type,
        category: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let transactions = state
        .db
        .transactions()
        .list(auth.company()?, &filter)
        .await?;
    Ok(ok(transactions))
}

async fn get_transaction(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let tx = state
        .db
        .transactions()
        .get_by_id(auth.company()?, &id)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", &id))?;
    Ok(ok(tx))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<TransactionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let tx = state
        .db
        .transactions()
        .create(auth.company()?, &auth.user_id, req.into_input()?)
        .await?;
    Ok(ok_message("Transaction created", tx))
}

async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TransactionRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let tx = state
        .db
        .transactions()
        .update(auth.company()?, &id, req.into_input()?)
        .await?;
    Ok(ok_message("Transaction updated", tx))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.transactions().delete(auth.company()?, &id).await?;
    Ok(ok_message("Transaction deleted", serde_json::Value::Null))
}

async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let stats = state
        .db
        .transactions()
        .stats(auth.company()?, query.start_date, query.end_date)
        .await?;
    Ok(ok(stats))
}

async fn monthly_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let months = state
        .db
        .transactions()
        .monthly_stats(auth.company()?, year)
        .await?;
    Ok(ok(months))
}
