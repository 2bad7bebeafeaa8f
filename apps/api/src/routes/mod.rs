//! # API Routes
//!
//! Route assembly and the shared response envelope.
//!
//! ## Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  /health                 GET     liveness probe                     │
//! │  /api/auth/register      POST    create account                     │
//! │  /api/auth/login         POST    email + password → tokens          │
//! │  /api/auth/refresh       POST    refresh token → new tokens         │
//! │  /api/auth/profile       GET/PUT current user + profile update      │
//! │  /api/auth/change-password  PUT  rotate password                    │
//! │  /api/auth/company       POST    create company for current user    │
//! │  /api/cashbook           GET/POST   list, create entry              │
//! │  /api/cashbook/balance   GET     current balance + today summary    │
//! │  /api/cashbook/stats     GET     totals by type                     │
//! │  /api/cashbook/{id}      GET/PUT/DELETE                             │
//! │  /api/customers          GET/POST  + /{id} GET/PUT/DELETE           │
//! │  /api/suppliers          GET/POST  + /{id} GET/PUT/DELETE           │
//! │  /api/products           GET/POST  + /{id}, /low-stock, /{id}/stock │
//! │  /api/invoices           GET/POST  + /{id}, /{id}/status, /stats    │
//! │  /api/transactions       GET/POST  + /{id}, /stats, /stats/monthly  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All `/api` routes except `/api/auth/register|login|refresh` require a
//! bearer access token; business routes additionally require the account
//! to have a company.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod auth;
pub mod cashbook;
pub mod customer;
pub mod invoice;
pub mod product;
pub mod supplier;
pub mod transaction;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/cashbook", cashbook::router())
        .nest("/api/customers", customer::router())
        .nest("/api/suppliers", supplier::router())
        .nest("/api/products", product::router())
        .nest("/api/invoices", invoice::router())
        .nest("/api/transactions", transaction::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Success envelope: `{ "success": true, "data": ... }`.
pub fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Success envelope with a human-readable message.
pub fn ok_message<T: Serialize>(message: &str, data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}
