// Authorization gate: bearer-token extraction and role checks
// Decision: Token verification failures all surface as 401; the sub-reason
// (malformed / bad signature / expired) is only logged server-side
// Decision: admin passes every role check

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use campus_core::Role;

use super::jwt::TokenService;
use super::service::AuthService;

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Authenticated account identity extracted from a request's bearer token
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthAccount {
    /// Check whether this account carries a role. Admin has all roles.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role || self.role == Role::Admin
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Check the decoded role against a route's allowed set
pub fn require_role(account: &AuthAccount, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.iter().any(|role| account.has_role(*role)) {
        Ok(())
    } else {
        Err(AuthError::forbidden("Insufficient role for this operation"))
    }
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub service: Arc<AuthService>,
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Extractor for the authenticated account.
/// This is required - returns 401 if not authenticated.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_account(parts, &auth_state)
    }
}

/// Extract and verify the bearer token from a request
fn extract_auth_account(parts: &mut Parts, auth_state: &AuthState) -> Result<AuthAccount, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::unauthorized("Invalid authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;

    let claims = auth_state.tokens.verify(token).map_err(|e| {
        // Precise rejection reason stays server-side
        tracing::debug!("token rejected: {}", e);
        AuthError::unauthorized("Invalid or expired token")
    })?;

    Ok(AuthAccount {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    })
}

/// Require admin role extractor
#[derive(Debug, Clone)]
pub struct AdminAccount(pub AuthAccount);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminAccount
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let account = AuthAccount::from_request_parts(parts, state).await?;

        if !account.is_admin() {
            return Err(AuthError::forbidden("Admin access required"));
        }

        Ok(AdminAccount(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> AuthAccount {
        AuthAccount {
            id: Uuid::now_v7(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_has_role() {
        let teacher = account(Role::Teacher);
        assert!(teacher.has_role(Role::Teacher));
        assert!(!teacher.has_role(Role::Student));
        assert!(!teacher.is_admin());
    }

    #[test]
    fn test_admin_has_all_roles() {
        let admin = account(Role::Admin);
        assert!(admin.is_admin());
        assert!(admin.has_role(Role::Teacher));
        assert!(admin.has_role(Role::Parent));
    }

    #[test]
    fn test_require_role() {
        let student = account(Role::Student);
        assert!(require_role(&student, &[Role::Admin, Role::Student]).is_ok());

        let err = require_role(&student, &[Role::Admin, Role::Teacher]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_error_statuses() {
        let unauthorized = AuthError::unauthorized("Test error");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.error, "Test error");

        let forbidden = AuthError::forbidden("Forbidden");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    }
}
