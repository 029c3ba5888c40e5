// Teacher profile routes
//
// Same gate shape as the student routes: admin and teacher tokens may read,
// only admin writes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use campus_core::{Role, TeacherProfile};

use super::common::{auth_error, ApiError, ErrorResponse, ListResponse, PageQuery};
use crate::auth::middleware::{require_role, AdminAccount, AuthAccount, AuthState, FromRef};
use crate::storage::{CreateTeacherRow, StorageBackend, StorageError, TeacherRow, UpdateTeacher};

const READ_ROLES: &[Role] = &[Role::Admin, Role::Teacher];

/// App state for teacher routes
#[derive(Clone)]
pub struct AppState {
    pub db: StorageBackend,
    pub auth: AuthState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Request to create a teacher profile
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Request to update a teacher profile. Only provided fields change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Create teacher routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/teachers", post(create_teacher).get(list_teachers))
        .route(
            "/teachers/:teacher_id",
            get(get_teacher)
                .patch(update_teacher)
                .delete(delete_teacher),
        )
        .with_state(state)
}

/// GET /teachers - List teacher profiles
#[utoipa::path(
    get,
    path = "/teachers",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("perPage" = Option<i64>, Query, description = "Page size, capped at 100")
    ),
    responses(
        (status = 200, description = "Page of teachers", body = ListResponse<TeacherProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed")
    ),
    security(("bearer" = [])),
    tag = "teachers"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    account: AuthAccount,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<TeacherProfile>>, ApiError> {
    require_role(&account, READ_ROLES).map_err(auth_error)?;

    let (limit, offset) = query.limit_offset();
    let rows = state
        .db
        .list_teachers(limit, offset)
        .await
        .map_err(storage_error)?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_profile).collect(),
    )))
}

/// POST /teachers - Create a teacher profile
#[utoipa::path(
    post,
    path = "/teachers",
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherProfile),
        (status = 400, description = "Duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer" = [])),
    tag = "teachers"
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Json(req): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherProfile>), ApiError> {
    let row = state
        .db
        .create_teacher(CreateTeacherRow {
            account_id: None,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            photo: req.photo,
            gender: req.gender,
        })
        .await
        .map_err(storage_error)?;

    Ok((StatusCode::CREATED, Json(row_to_profile(row))))
}

/// GET /teachers/{teacher_id} - Get a teacher profile
#[utoipa::path(
    get,
    path = "/teachers/{teacher_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher found", body = TeacherProfile),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "teachers"
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    account: AuthAccount,
    Path(teacher_id): Path<Uuid>,
) -> Result<Json<TeacherProfile>, ApiError> {
    require_role(&account, READ_ROLES).map_err(auth_error)?;

    let row = state
        .db
        .get_teacher(teacher_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(not_found)?;

    Ok(Json(row_to_profile(row)))
}

/// PATCH /teachers/{teacher_id} - Update a teacher profile
#[utoipa::path(
    patch,
    path = "/teachers/{teacher_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherProfile),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "teachers"
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(teacher_id): Path<Uuid>,
    Json(req): Json<UpdateTeacherRequest>,
) -> Result<Json<TeacherProfile>, ApiError> {
    let row = state
        .db
        .update_teacher(
            teacher_id,
            UpdateTeacher {
                first_name: req.first_name,
                last_name: req.last_name,
                photo: req.photo,
                gender: req.gender,
            },
        )
        .await
        .map_err(storage_error)?
        .ok_or_else(not_found)?;

    Ok(Json(row_to_profile(row)))
}

/// DELETE /teachers/{teacher_id} - Delete a teacher profile
#[utoipa::path(
    delete,
    path = "/teachers/{teacher_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "teachers"
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(teacher_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_teacher(teacher_id)
        .await
        .map_err(storage_error)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

fn row_to_profile(row: TeacherRow) -> TeacherProfile {
    TeacherProfile {
        id: row.id,
        account_id: row.account_id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        photo: row.photo,
        gender: row.gender,
        created_at: row.created_at,
    }
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Teacher not found")),
    )
}

fn storage_error(err: StorageError) -> ApiError {
    match err {
        StorageError::DuplicateEmail => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("A teacher with this email already exists")),
        ),
        other => {
            tracing::error!("teacher storage failure: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
        }
    }
}
