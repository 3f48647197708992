//! Post-authentication routing and per-role view guards.

use actix_web::HttpRequest;
use sqlx::PgPool;

use super::Principal;
use crate::errors::AppError;
use crate::utils::jwt;

pub const ADMIN_LOGIN_ROUTE: &str = "/v1/auth/admin/login";
pub const EMPLOYEE_LOGIN_ROUTE: &str = "/v1/auth/employee/login";

/// Landing area a principal belongs to after authentication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Landing {
    Admin,
    Employee,
}

impl Landing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Landing::Admin => "admin",
            Landing::Employee => "employee",
        }
    }
}

/// Staff accounts land in the admin area, linked employees in theirs.
/// An authenticated account with neither is anomalous and gets no
/// destination; the caller falls through to a generic page.
pub fn landing(principal: &Principal) -> Option<Landing> {
    if principal.account.is_staff {
        return Some(Landing::Admin);
    }
    if principal.employee.is_some() {
        return Some(Landing::Employee);
    }
    None
}

/// A view guard: a predicate over the principal plus the login route to
/// bounce to when it denies. Guards are composed at the handler seam.
pub struct Guard {
    pub check: fn(&Principal) -> bool,
    pub login_route: &'static str,
}

fn is_admin(principal: &Principal) -> bool {
    principal.account.is_staff
}

fn is_employee(principal: &Principal) -> bool {
    !principal.account.is_staff && principal.employee.is_some()
}

pub const ADMIN_ONLY: Guard = Guard {
    check: is_admin,
    login_route: ADMIN_LOGIN_ROUTE,
};

pub const EMPLOYEE_ONLY: Guard = Guard {
    check: is_employee,
    login_route: EMPLOYEE_LOGIN_ROUTE,
};

impl Guard {
    /// A missing principal (no or invalid token) denies the same way a
    /// failed check does: 303 to this guard's login route.
    pub fn enforce(&self, principal: Option<Principal>) -> Result<Principal, AppError> {
        match principal {
            Some(p) if (self.check)(&p) => Ok(p),
            _ => Err(AppError::Redirect(self.login_route.to_string())),
        }
    }

    /// Recover the principal from the request's bearer token, then enforce.
    pub async fn require(
        &self,
        req: &HttpRequest,
        pool: &PgPool,
    ) -> Result<Principal, AppError> {
        let principal = match bearer_account_id(req) {
            Some(account_id) => Principal::load(pool, account_id).await.map_err(|e| {
                log::error!("Database error while loading principal: {:?}", e);
                AppError::DatabaseError("Database error".to_string())
            })?,
            None => None,
        };
        self.enforce(principal)
    }
}

fn bearer_account_id(req: &HttpRequest) -> Option<i64> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.split_whitespace().nth(1))?;
    let claims = jwt::validate_token(token).ok()?;
    claims.sub.parse().ok()
}
