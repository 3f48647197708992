pub mod guards;
pub mod identity;

use sqlx::PgPool;

use crate::models::account::Account;
use crate::models::employee::Employee;

/// An authenticated identity: the account plus its optional employee
/// record. Accounts with no employee link are administrators.
#[derive(Debug, Clone)]
pub struct Principal {
    pub account: Account,
    pub employee: Option<Employee>,
}

impl Principal {
    pub async fn load(pool: &PgPool, account_id: i64) -> Result<Option<Principal>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(pool)
            .await?;

        let Some(account) = account else {
            return Ok(None);
        };

        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE account_id = $1")
            .bind(account.account_id)
            .fetch_optional(pool)
            .await?;

        Ok(Some(Principal { account, employee }))
    }
}
