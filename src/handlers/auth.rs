use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::guards::{self, landing};
use crate::auth::identity;
use crate::errors::AppError;
use crate::utils::passwords::{hash_password, verify_password};
use crate::utils::validation::validate_payload;
use crate::utils::jwt;

// Unknown identifier, wrong password, and disabled account all surface
// this exact message so callers cannot enumerate accounts.
const LOGIN_FAILED: &str = "Invalid credentials.";

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    identifier: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

#[derive(Deserialize, Validate)]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1, max = 128))]
    current_password: String,
    #[validate(length(min = 8, max = 128))]
    new_password: String,
}

fn map_db_error(err: sqlx::Error) -> AppError {
    log::error!("Database error during authentication: {:?}", err);
    AppError::DatabaseError("Database error".to_string())
}

async fn login_flow(
    pool: &PgPool,
    payload: &LoginRequest,
    role: &str,
) -> Result<HttpResponse, actix_web::Error> {
    validate_payload(payload)?;

    let principal = identity::resolve(pool, &payload.identifier, &payload.password)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::Unauthorized(LOGIN_FAILED.to_string()))?;

    let token = jwt::generate_token(principal.account.account_id)
        .map_err(|_| AppError::InternalServerError("Token generation error".to_string()))?;

    log::info!(
        "Login for account {} via {} entry point",
        principal.account.username,
        role
    );

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "role": role,
        "landing": landing(&principal).map(|l| l.as_str()),
        "username": principal.account.username,
    })))
}

pub async fn admin_login(
    pool: web::Data<PgPool>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    login_flow(&pool, &payload, "admin").await
}

pub async fn employee_login(
    pool: web::Data<PgPool>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    login_flow(&pool, &payload, "employee").await
}

// Tokens are stateless; teardown is the client discarding its copy.
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "You have been logged out.",
    }))
}

/// Employee-guarded password change. A fresh token is returned so the
/// caller's current session survives the credential swap.
pub async fn change_password(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    payload: web::Json<PasswordChangeRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let principal = guards::EMPLOYEE_ONLY.require(&req, &pool).await?;
    validate_payload(&payload.0)?;

    if !verify_password(&principal.account.password_hash, &payload.current_password) {
        return Err(AppError::BadRequest("Current password is incorrect.".to_string()).into());
    }

    let new_hash = hash_password(&payload.new_password)
        .map_err(|_| AppError::InternalServerError("Hashing error".to_string()))?;

    crate::store::update_password(&pool, principal.account.account_id, &new_hash)
        .await
        .map_err(map_db_error)?;

    let token = jwt::generate_token(principal.account.account_id)
        .map_err(|_| AppError::InternalServerError("Token generation error".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Your password has been updated successfully.",
        "token": token,
    })))
}
