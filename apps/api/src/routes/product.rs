//! Product endpoints, including the low-stock listing and manual stock
//! adjustments.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use defter_core::validation::{validate_amount, validate_name};
use defter_core::Money;
use defter_db::{DbError, ProductInput};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/low-stock", get(low_stock))
        .route("/{id}", get(get_product).put(update).delete(delete))
        .route("/{id}/stock", post(adjust_stock))
}

#[derive(Debug, Deserialize)]
struct ProductRequest {
    name: String,
    description: Option<String>,
    price_kurus: i64,
    cost_kurus: Option<i64>,
    barcode: Option<String>,
    category: Option<String>,
    #[serde(default = "default_unit")]
    unit: String,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    min_stock: i64,
}

fn default_unit() -> String {
    "adet".to_string()
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StockAdjustment {
    /// Signed quantity: positive receives stock, negative issues it.
    delta: i64,
}

impl ProductRequest {
    fn into_input(self) -> ApiResult<ProductInput> {
        validate_name("name", &self.name)?;
        validate_amount("price", Money::from_kurus(self.price_kurus))?;
        if self.stock < 0 || self.min_stock < 0 {
            return Err(ApiError::BadRequest(
                "stock and min_stock must not be negative".to_string(),
            ));
        }
        Ok(ProductInput {
            name: self.name,
            description: self.description,
            price_kurus: self.price_kurus,
            cost_kurus: self.cost_kurus,
            barcode: self.barcode,
            category: self.category,
            unit: self.unit,
            stock: self.stock,
            min_stock: self.min_stock,
        })
    }
}

async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state
        .db
        .products()
        .list(auth.company()?, query.search.as_deref())
        .await?;
    Ok(ok(products))
}

async fn low_stock(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let products = state.db.products().low_stock(auth.company()?).await?;
    Ok(ok(products))
}

async fn get_product(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let product = state
        .db
        .products()
        .get_by_id(auth.company()?, &id)
        .await?
        .ok_or_else(|| DbError::not_found("Product", &id))?;
    Ok(ok(product))
}

async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let product = state
        .db
        .products()
        .create(auth.company()?, req.into_input()?)
        .await?;
    Ok(ok_message("Product created", product))
}

async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let product = state
        .db
        .products()
        .update(auth.company()?, &id, req.into_input()?)
        .await?;
    Ok(ok_message("Product updated", product))
}

async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.db.products().delete(auth.company()?, &id).await?;
    Ok(ok_message("Product deleted", serde_json::Value::Null))
}

async fn adjust_stock(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StockAdjustment>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.delta == 0 {
        return Err(ApiError::BadRequest("delta must not be zero".to_string()));
    }

    let product = state
        .db
        .products()
        .adjust_stock(auth.company()?, &id, req.delta)
        .await?;

    info!(product_id = %id, delta = req.delta, "Stock adjusted");
    Ok(ok_message("Stock adjusted", product))
}
