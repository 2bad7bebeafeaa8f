//! Customer endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use defter_core::validation::validate_name;
use defter_db::{CustomerInput, DbError};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_customer).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct CustomerRequest {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    tax_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

impl CustomerRequest {
    fn into_input(self) -> ApiResult<CustomerInput> {
        validate_name("name", &self.name)?;
        Ok(CustomerInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            tax_number: self.tax_number,
        })
    }
}

async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let customers = state
        .db
        .customers()
        .list(auth.company()?, query.search.as_deref())
        .await?;
    Ok(ok(customers))
}

async fn get_customer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let customer = state
        .db
        .customers()
        .get_by_id(auth.company()?, &id)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", &id))?;
    Ok(ok(customer))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CustomerRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let customer = state
        .db
        .customers()
        .create(auth.company()?, req.into_input()?)
        .await?;
    Ok(ok_message("Customer created", customer))
}

async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CustomerRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let customer = state
        .db
        .customers()
        .update(auth.company()?, &id, req.into_input()?)
        .await?;
    Ok(ok_message("Customer updated", customer))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.customers().delete(auth.company()?, &id).await?;
    Ok(ok_message("Customer deleted", serde_json::Value::Null))
}
