//! Auth Middleware
//!
//! Bearer-token authentication and role gates for protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::token::{AuthContext, TokenService};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. A missing header, a non-UTF-8
/// value, another scheme or an empty token all yield `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a valid bearer token.
///
/// On success the caller's [`AuthContext`] is placed in the request
/// extensions; on failure the request never reaches the handler.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
    let claims = tokens.validate(token)?;

    req.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(req).await)
}

const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// The set of roles allowed through a [`require_role`] layer
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    allowed: &'static [UserRole],
}

impl RoleGate {
    pub const fn new(allowed: &'static [UserRole]) -> Self {
        Self { allowed }
    }

    pub const fn admin_only() -> Self {
        Self::new(ADMIN_ONLY)
    }

    pub fn allows(&self, role: UserRole) -> bool {
        self.allowed.contains(&role)
    }
}

/// Middleware that admits only roles in `gate`. Must run after [`require_auth`];
/// without an [`AuthContext`] the request is refused.
pub async fn require_role(
    gate: RoleGate,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(ctx) = req.extensions().get::<AuthContext>() else {
        tracing::warn!("Role gate reached without an authenticated context");
        return Err(AuthError::InsufficientRole);
    };

    if !gate.allows(ctx.role) {
        tracing::debug!(user_id = %ctx.user_id, role = %ctx.role, "Role not permitted");
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(req).await)
}
