// Authentication HTTP routes
//
// Thin handlers over the AuthService: deserialize, validate the required
// name fields, map the flow errors onto the wire statuses. The not-found vs
// bad-password status split is deliberate reference-compatible behavior.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use campus_core::{Account, Role};

use super::middleware::{AuthAccount, AuthState};
use super::service::{AuthFlowError, RegisterInput};
use crate::api::common::{ApiError, ErrorResponse};

/// Register request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful register/login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: Account,
    pub token: String,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

/// POST /auth/register - Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Duplicate account or invalid fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_non_empty("email", &req.email)?;
    validate_non_empty("password", &req.password)?;
    validate_non_empty("firstName", &req.first_name)?;
    validate_non_empty("lastName", &req.last_name)?;

    let (user, token) = state
        .service
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            photo: req.photo,
            gender: req.gender,
        })
        .await
        .map_err(flow_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created".to_string(),
            user,
            token,
        }),
    ))
}

/// POST /auth/login - Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = state
        .service
        .login(&req.email, &req.password)
        .await
        .map_err(flow_error)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

/// GET /auth/me - Get the authenticated account's public view
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AuthState>,
    account: AuthAccount,
) -> Result<Json<Account>, ApiError> {
    let user = state
        .service
        .get_account(account.id)
        .await
        .map_err(flow_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Account not found")),
            )
        })?;

    Ok(Json(user))
}

fn validate_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("{field} must not be empty"))),
        ));
    }
    Ok(())
}

/// Map flow errors onto the wire statuses
fn flow_error(err: AuthFlowError) -> ApiError {
    match err {
        AuthFlowError::DuplicateAccount => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("An account with this email already exists")),
        ),
        AuthFlowError::AccountNotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Account not found")),
        ),
        AuthFlowError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid credentials")),
        ),
        AuthFlowError::Persistence(e) => {
            tracing::error!("storage failure in auth flow: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
        }
        AuthFlowError::Internal(e) => {
            tracing::error!("auth flow failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
        }
    }
}
