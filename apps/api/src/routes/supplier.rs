//! Supplier endpoints. Same surface as customers.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use defter_core::validation::validate_name;
use defter_db::{DbError, SupplierInput};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_supplier).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct SupplierRequest {
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

impl SupplierRequest {
    fn into_input(self) -> ApiResult<SupplierInput> {
        validate_name("name", &self.name)?;
        Ok(SupplierInput {
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
    let suppliers = state
        .db
        .suppliers()
        .list(auth.company()?, query.search.as_deref())
        .await?;
    Ok(ok(suppliers))
}

async fn get_supplier(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let supplier = state
        .db
        .suppliers()
        .get_by_id(auth.company()?, &id)
        .await?
        .ok_or_else(|| DbError::not_found("Supplier", &id))?;
    Ok(ok(supplier))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SupplierRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let supplier = state
        .db
        .suppliers()
        .create(auth.company()?, req.into_input()?)
        .await?;
    Ok(ok_message("Supplier created", supplier))
}

async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SupplierRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let supplier = state
        .db
        .suppliers()
        .update(auth.company()?, &id, req.into_input()?)
        .await?;
    Ok(ok_message("Supplier updated", supplier))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.suppliers().delete(auth.company()?, &id).await?;
    Ok(ok_message("Supplier deleted", serde_json::Value::Null))
}
