//! Persistence for the employee directory and its linked accounts.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::employee::Employee;

/// Dashboard preview cap when `view=all` is not requested.
pub const PREVIEW_LIMIT: i64 = 8;
/// Hard cap for the typeahead lookup endpoint.
pub const SEARCH_LIMIT: i64 = 50;

const SEARCH_FIELDS: [&str; 6] = [
    "employee_id",
    "first_name",
    "last_name",
    "email",
    "department",
    "role",
];

/// Quote LIKE metacharacters so the query text matches literally.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn push_search_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &str) {
    let pattern = format!("%{}%", escape_like(query));
    builder.push(" WHERE (");
    for (i, field) in SEARCH_FIELDS.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(*field);
        builder.push(" ILIKE ");
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}

/// Free-text filter OR-combined across the directory's searchable fields,
/// always ordered by employee_id ascending.
pub async fn search(
    pool: &PgPool,
    query: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<Employee>, sqlx::Error> {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM employees");

    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        push_search_filter(&mut builder, q);
    }

    builder.push(" ORDER BY employee_id ASC");

    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    builder.build_query_as::<Employee>().fetch_all(pool).await
}

/// The full collection, for the aggregator. Reads everything into memory
/// on each call; the dataset is assumed small.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY employee_id ASC")
        .fetch_all(pool)
        .await
}

pub async fn by_id(pool: &PgPool, id: i64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn employee_id_taken(pool: &PgPool, employee_id: &str) -> Result<bool, sqlx::Error> {
    let exists: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM employees WHERE LOWER(employee_id) = LOWER($1)")
            .bind(employee_id)
            .fetch_optional(pool)
            .await?;
    Ok(exists.is_some())
}

pub async fn account_identifier_taken(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let exists: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM accounts WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2)",
    )
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(exists.is_some())
}

pub struct NewEmployeeRecord<'a> {
    pub employee_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub department: Option<&'a str>,
    pub role: &'a str,
    pub status: &'a str,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub full_time: bool,
}

pub async fn insert_account(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_scalar(
        "INSERT INTO accounts \
         (username, email, password_hash, is_staff, is_superuser, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, FALSE, FALSE, TRUE, $4, $4) RETURNING account_id",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn insert_employee(
    pool: &PgPool,
    account_id: i64,
    record: &NewEmployeeRecord<'_>,
) -> Result<Employee, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Employee>(
        "INSERT INTO employees \
         (account_id, employee_id, first_name, last_name, email, department, role, status, \
          salary, hire_date, full_time, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) RETURNING *",
    )
    .bind(account_id)
    .bind(record.employee_id)
    .bind(record.first_name)
    .bind(record.last_name)
    .bind(record.email)
    .bind(record.department)
    .bind(record.role)
    .bind(record.status)
    .bind(record.salary)
    .bind(record.hire_date)
    .bind(record.full_time)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update_password(
    pool: &PgPool,
    account_id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = $2 WHERE account_id = $3")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_employee(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// Cascade partner of delete_employee. Runs second; if it fails after the
// employee row is gone the store is left inconsistent (known gap).
pub async fn delete_account(pool: &PgPool, account_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM accounts WHERE account_id = $1")
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn search_filter_ors_every_directory_field() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM employees");
        push_search_filter(&mut builder, "eng");
        let sql = builder.sql();
        for field in SEARCH_FIELDS {
            assert!(sql.contains(&format!("{} ILIKE ", field)), "missing {field} in {sql}");
        }
        assert_eq!(sql.matches(" OR ").count(), SEARCH_FIELDS.len() - 1);
    }
}
