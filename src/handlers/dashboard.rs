use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;

use crate::auth::guards;
use crate::errors::AppError;
use crate::metrics;
use crate::models::employee::Employee;
use crate::store;

#[derive(Deserialize)]
pub struct DashboardQuery {
    q: Option<String>,
    view: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

/// Reduced projection for the typeahead table, with locale-fixed dates
/// and per-row action links.
#[derive(Serialize)]
pub struct SearchRow {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
    pub status: String,
    pub hire_date: Option<String>,
    pub detail_url: String,
    pub edit_url: String,
    pub delete_url: String,
}

fn format_hire_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

fn search_row(employee: &Employee) -> SearchRow {
    let resource = format!("/v1/employee/{}", employee.id);
    SearchRow {
        id: employee.id,
        employee_id: employee.employee_id.clone(),
        name: employee.full_name(),
        role: employee.role.clone(),
        department: employee.department.clone(),
        status: employee.status.clone(),
        hire_date: employee.hire_date.map(format_hire_date),
        detail_url: resource.clone(),
        edit_url: resource.clone(),
        delete_url: resource,
    }
}

fn map_db_error(err: sqlx::Error) -> AppError {
    log::error!("Database error building dashboard: {:?}", err);
    AppError::DatabaseError("Database error".to_string())
}

/// Admin dashboard context: aggregate metrics over the full collection
/// plus the filtered listing in preview or show-all mode.
pub async fn admin_dashboard(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;

    // Metrics always reduce over every record, never the filtered view.
    let all_employees = store::load_all(&pool).await.map_err(map_db_error)?;
    let today = Local::now().date_naive();
    let metrics = metrics::compute(&all_employees, today);

    let text = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let show_all = query.view.as_deref() == Some("all");
    let limit = if show_all { None } else { Some(store::PREVIEW_LIMIT) };
    let displayed = store::search(&pool, text, limit).await.map_err(map_db_error)?;

    Ok(HttpResponse::Ok().json(json!({
        "displayed_employees": displayed,
        "employees_count": metrics.total_employees,
        "full_time_count": metrics.full_time_count,
        "department_count": metrics.department_count,
        "average_salary": metrics.average_salary,
        "average_tenure": metrics.average_tenure,
        "department_chart": metrics.department_chart,
        "status_chart": metrics.status_chart,
        "department_salary_chart": metrics.department_salary_chart,
        "department_tenure_chart": metrics.department_tenure_chart,
        "query": text,
        "show_all_employees": show_all,
        "preview_limit": store::PREVIEW_LIMIT,
    })))
}

/// Interactive lookup backing the dashboard search box.
pub async fn employee_search(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let _principal = guards::ADMIN_ONLY.require(&req, &pool).await?;

    let text = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let matches = store::search(&pool, text, Some(store::SEARCH_LIMIT))
        .await
        .map_err(map_db_error)?;
    let results: Vec<SearchRow> = matches.iter().map(search_row).collect();

    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

/// The caller's own record, for the employee landing area.
pub async fn employee_dashboard(
    req: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, actix_web::Error> {
    let principal = guards::EMPLOYEE_ONLY.require(&req, &pool).await?;
    // The guard only passes principals with a linked employee.
    let employee = principal
        .employee
        .ok_or_else(|| AppError::InternalServerError("Missing employee link".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "employee": employee })))
}
