use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential/authorization side of a principal. Business attributes live on
/// the linked `Employee`; an account without one is an administrator.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
