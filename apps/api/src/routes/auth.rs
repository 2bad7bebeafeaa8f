//! Authentication endpoints: register, login, token refresh, profile
//! management and company creation.

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use defter_core::validation::{validate_email, validate_name, validate_password};
use defter_core::UserRole;
use defter_db::{NewCompany, NewUser};

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, ok_message};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/profile", get(profile).put(update_profile))
        .route("/change-password", put(change_password))
        .route("/company", post(create_company))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct CreateCompanyRequest {
    name: String,
    tax_number: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_name("first_name", &req.first_name)?;
    validate_name("last_name", &req.last_name)?;

    let password_hash = hash_password(&req.password)?;

    let user = state
        .db
        .users()
        .create(NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            role: UserRole::Admin,
        })
        .await?;

    info!(user_id = %user.id, "User registered");

    let access_token = state
        .jwt
        .generate_access_token(&user.id, None, &user.email)?;
    let refresh_token = state
        .jwt
        .generate_refresh_token(&user.id, None, &user.email)?;

    Ok(ok_message(
        "Registration successful",
        json!({
            "user": user,
            "access_token": access_token,
            "refresh_token": refresh_token,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state
        .db
        .users()
        .find_by_email(&req.email)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::AuthFailed("Invalid email or password".to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::AuthFailed("Invalid email or password".to_string()));
    }

    info!(user_id = %user.id, "User logged in");

    let company_id = user.company_id.as_deref();
    let access_token = state
        .jwt
        .generate_access_token(&user.id, company_id, &user.email)?;
    let refresh_token = state
        .jwt
        .generate_refresh_token(&user.id, company_id, &user.email)?;

    Ok(ok(json!({
        "user": user,
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

/// Exchanges a refresh token for a fresh token pair. Claims are rebuilt
/// from the database so a newly attached company lands in the new tokens.
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let claims = state.jwt.validate_refresh_token(&req.refresh_token)?;

    let user = state
        .db
        .users()
        .get_by_id(&claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::AuthFailed("Account no longer active".to_string()))?;

    let company_id = user.company_id.as_deref();
    let access_token = state
        .jwt
        .generate_access_token(&user.id, company_id, &user.email)?;
    let refresh_token = state
        .jwt
        .generate_refresh_token(&user.id, company_id, &user.email)?;

    Ok(ok(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

async fn profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = state
        .db
        .users()
        .get_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::AuthFailed("Account no longer exists".to_string()))?;

    let company = match &user.company_id {
        Some(id) => state.db.users().get_company(id).await?,
        None => None,
    };

    Ok(ok(json!({ "user": user, "company": company })))
}

async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_name("first_name", &req.first_name)?;
    validate_name("last_name", &req.last_name)?;

    let user = state
        .db
        .users()
        .update_profile(&auth.user_id, &req.first_name, &req.last_name)
        .await?;

    Ok(ok_message("Profile updated", user))
}

async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_password(&req.new_password)?;

    let user = state
        .db
        .users()
        .get_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::AuthFailed("Account no longer exists".to_string()))?;

    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::AuthFailed("Current password is incorrect".to_string()));
    }

    let password_hash = hash_password(&req.new_password)?;
    state
        .db
        .users()
        .update_password(&auth.user_id, &password_hash)
        .await?;

    info!(user_id = %auth.user_id, "Password changed");
    Ok(ok_message("Password changed", serde_json::Value::Null))
}

async fn create_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if auth.company_id.is_some() {
        return Err(ApiError::Conflict(
            "Account already belongs to a company".to_string(),
        ));
    }
    validate_name("name", &req.name)?;

    let company = state
        .db
        .users()
        .create_company(
            &auth.user_id,
            NewCompany {
                name: req.name,
                tax_number: req.tax_number,
                address: req.address,
                phone: req.phone,
                email: req.email,
            },
        )
        .await?;

    info!(company_id = %company.id, user_id = %auth.user_id, "Company created");

    // Fresh tokens carrying the new company
    let access_token =
        state
            .jwt
            .generate_access_token(&auth.user_id, Some(&company.id), &auth.email)?;
    let refresh_token =
        state
            .jwt
            .generate_refresh_token(&auth.user_id, Some(&company.id), &auth.email)?;

    Ok(ok_message(
        "Company created",
        json!({
            "company": company,
            "access_token": access_token,
            "refresh_token": refresh_token,
        }),
    ))
}
