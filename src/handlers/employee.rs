use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::guards;
use crate::errors::AppError;
use crate::store::{self, NewEmployeeRecord};
use crate::utils::passwords::hash_password;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewEmployee {
    #[validate(length(min = 2, max = 32))]
    employee_id: String,
    #[validate(length(min = 1, max = 64))]
    first_name: String,
    #[validate(length(min = 1, max = 64))]
    last_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(max = 64))]
    department: Option<String>,
    #[validate(length(min = 2, max = 64))]
    role: String,
    #[validate(custom = "validate_status")]
    status: String,
    salary: Option<Decimal>,
    hire_date: Option<NaiveDate>,
    full_time: bool,
    // Credentials for the linked account; every employee has exactly one.
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
}

#[derive(Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(length(min = 1, max = 64))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    last_name: Option<String>,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(max = 64))]
    department: Option<String>,
    #[validate(length(min = 2, max = 64))]
    role: Option<String>,
    #[validate(custom = "validate_status")]
    status: Option<String>,
    salary: Option<Decimal>,
    hire_date: Option<NaiveDate>,
    full_time: Option<bool>,
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if status != "active" && status != "inactive" {
        return Err(validator::ValidationError::new(
            "Status must be either 'active' or 'inactive'",
        ));
    }
    Ok(())
}

fn map_db_error(err: sqlx::Error) -> AppError {
    log::error!("Database error in employee handler: {:?}", err);
    AppError::DatabaseError("Database error".to_string())
}

pub async fn create_employee(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;
    validate_payload(&payload.0)?;

    if store::employee_id_taken(&pool, &payload.employee_id)
        .await
        .map_err(map_db_error)?
    {
        return Err(AppError::Conflict("Employee ID already exists".to_string()).into());
    }
    if store::account_identifier_taken(&pool, &payload.username, &payload.email)
        .await
        .map_err(map_db_error)?
    {
        return Err(AppError::Conflict("Username or email already exists".to_string()).into());
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|_| AppError::InternalServerError("Hashing error".to_string()))?;

    let account_id = store::insert_account(&pool, &payload.username, &payload.email, &password_hash)
        .await
        .map_err(map_db_error)?;

    let record = NewEmployeeRecord {
        employee_id: &payload.employee_id,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        email: &payload.email,
        department: payload.department.as_deref(),
        role: &payload.role,
        status: &payload.status,
        salary: payload.salary,
        hire_date: payload.hire_date,
        full_time: payload.full_time,
    };
    let employee = store::insert_employee(&pool, account_id, &record)
        .await
        .map_err(map_db_error)?;

    log::info!("Employee {} created", employee.employee_id);

    Ok(HttpResponse::Created().json(json!({
        "message": format!("Employee {} was created successfully.", employee.full_name()),
        "employee": employee,
    })))
}

pub async fn employee_detail(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;

    let employee = store::by_id(&pool, path.into_inner())
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "employee": employee })))
}

pub async fn update_employee(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;
    validate_payload(&updates.0)?;

    let id = path.into_inner();
    let employee = store::by_id(&pool, id)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let mut builder: sqlx::QueryBuilder<'_, sqlx::Postgres> =
        sqlx::QueryBuilder::new("UPDATE employees SET ");
    let mut separated = builder.separated(", ");

    if let Some(first_name) = &updates.first_name {
        separated.push("first_name = ");
        separated.push_bind_unseparated(first_name);
    }
    if let Some(last_name) = &updates.last_name {
        separated.push("last_name = ");
        separated.push_bind_unseparated(last_name);
    }
    if let Some(email) = &updates.email {
        separated.push("email = ");
        separated.push_bind_unseparated(email);
    }
    if let Some(department) = &updates.department {
        separated.push("department = ");
        separated.push_bind_unseparated(department);
    }
    if let Some(role) = &updates.role {
        separated.push("role = ");
        separated.push_bind_unseparated(role);
    }
    if let Some(status) = &updates.status {
        separated.push("status = ");
        separated.push_bind_unseparated(status);
    }
    if let Some(salary) = updates.salary {
        separated.push("salary = ");
        separated.push_bind_unseparated(salary);
    }
    if let Some(hire_date) = updates.hire_date {
        separated.push("hire_date = ");
        separated.push_bind_unseparated(hire_date);
    }
    if let Some(full_time) = updates.full_time {
        separated.push("full_time = ");
        separated.push_bind_unseparated(full_time);
    }
    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    builder.push(" WHERE id = ");
    builder.push_bind(employee.id);

    builder
        .build()
        .execute(&**pool)
        .await
        .map_err(map_db_error)?;

    let updated = store::by_id(&pool, id)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Employee {} was updated successfully.", updated.full_name()),
        "employee": updated,
    })))
}

/// Delete removes the employee row first, then its linked account.
/// There is no transaction around the pair; a failure between the two
/// leaves an orphan account (documented limitation).
pub async fn delete_employee(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;

    let employee = store::by_id(&pool, path.into_inner())
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let full_name = employee.full_name();
    store::delete_employee(&pool, employee.id)
        .await
        .map_err(map_db_error)?;
    store::delete_account(&pool, employee.account_id)
        .await
        .map_err(map_db_error)?;

    log::info!("Employee {} deleted", employee.employee_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Employee {} was deleted successfully.", full_name),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_only_the_known_states() {
        assert!(validate_status("active").is_ok());
        assert!(validate_status("inactive").is_ok());
        assert!(validate_status("retired").is_err());
        assert!(validate_status("").is_err());
    }
}
