//! Dual-identity login: one identifier string matched against username,
//! email, or linked employee ID.

use sqlx::PgPool;

use super::Principal;
use crate::models::account::Account;
use crate::models::employee::Employee;
use crate::utils::passwords::verify_password;

/// The fields a login identifier is matched against, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityField {
    Username,
    Email,
    EmployeeId,
}

pub const CANDIDATE_ORDER: [IdentityField; 3] = [
    IdentityField::Username,
    IdentityField::Email,
    IdentityField::EmployeeId,
];

/// Case-insensitive-equals lookup against the backing store. Within one
/// field, multiple logical matches resolve to the lowest account id.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    async fn find_by(
        &self,
        field: IdentityField,
        identifier: &str,
    ) -> Result<Option<Principal>, sqlx::Error>;
}

/// Resolve `(identifier, password)` to a principal, or `None`.
///
/// Candidates are tried in `CANDIDATE_ORDER`; the first field that yields
/// a row decides the outcome and later candidates are not consulted, even
/// if the password then fails. Unknown identifier, wrong password, and a
/// disabled account all collapse to `Ok(None)` so the caller cannot tell
/// which one happened.
pub async fn resolve<S: IdentityStore>(
    store: &S,
    identifier: &str,
    password: &str,
) -> Result<Option<Principal>, sqlx::Error> {
    let identifier = identifier.trim();
    if identifier.is_empty() || password.is_empty() {
        return Ok(None);
    }

    for field in CANDIDATE_ORDER {
        if let Some(principal) = store.find_by(field, identifier).await? {
            if verify_password(&principal.account.password_hash, password)
                && principal.account.is_active
            {
                return Ok(Some(principal));
            }
            return Ok(None);
        }
    }

    Ok(None)
}

const FIND_BY_USERNAME: &str = "SELECT a.* FROM accounts a \
     WHERE LOWER(a.username) = LOWER($1) ORDER BY a.account_id LIMIT 1";
const FIND_BY_EMAIL: &str = "SELECT a.* FROM accounts a \
     WHERE LOWER(a.email) = LOWER($1) ORDER BY a.account_id LIMIT 1";
const FIND_BY_EMPLOYEE_ID: &str = "SELECT a.* FROM accounts a \
     JOIN employees e ON e.account_id = a.account_id \
     WHERE LOWER(e.employee_id) = LOWER($1) ORDER BY a.account_id LIMIT 1";

impl IdentityStore for PgPool {
    async fn find_by(
        &self,
        field: IdentityField,
        identifier: &str,
    ) -> Result<Option<Principal>, sqlx::Error> {
        let sql = match field {
            IdentityField::Username => FIND_BY_USERNAME,
            IdentityField::Email => FIND_BY_EMAIL,
            IdentityField::EmployeeId => FIND_BY_EMPLOYEE_ID,
        };

        let account = sqlx::query_as::<_, Account>(sql)
            .bind(identifier)
            .fetch_optional(self)
            .await?;

        let Some(account) = account else {
            return Ok(None);
        };

        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE account_id = $1")
            .bind(account.account_id)
            .fetch_optional(self)
            .await?;

        Ok(Some(Principal { account, employee }))
    }
}
