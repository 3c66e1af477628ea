//! Role-based authorization.
//!
//! Protected routes carry a [`RoleRequirement`]; the [`require_role`] layer
//! evaluates it with [`authorize`] against the claims left in the request by
//! the authentication middleware.

use crate::auth::jwt::Claims;
use crate::types::{AppError, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::borrow::Cow;
use tracing::debug;

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// A role the caller must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleRequirement(Cow<'static, str>);

impl RoleRequirement {
    pub fn new(role: impl Into<Cow<'static, str>>) -> Self {
        Self(role.into())
    }

    pub const fn admin() -> Self {
        Self(Cow::Borrowed(ADMIN_ROLE))
    }

    pub fn role(&self) -> &str {
        &self.0
    }
}

/// Grants access iff the claims hold the required role (exact, case-sensitive).
pub fn authorize(claims: &Claims, requirement: &RoleRequirement) -> Result<()> {
    if claims.has_role(requirement.role()) {
        Ok(())
    } else {
        debug!(sub = %claims.sub, required = %requirement.role(), "authorization denied");
        Err(AppError::Forbidden)
    }
}

/// Middleware enforcing a [`RoleRequirement`].
///
/// Must run after `auth_middleware`; a request without claims is treated as
/// unauthenticated.
pub async fn require_role(
    State(requirement): State<RoleRequirement>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::Unauthenticated)?;

    authorize(claims, &requirement)?;

    Ok(next.run(req).await)
}
