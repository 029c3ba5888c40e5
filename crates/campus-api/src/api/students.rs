// Student profile routes
//
// Listing and reads are open to admin and teacher tokens; writes are
// admin-only. Handlers call storage directly - the only business logic here
// is the role gate and the row-to-domain mapping.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use campus_core::{Role, StudentProfile};

use super::common::{auth_error, ApiError, ErrorResponse, ListResponse, PageQuery};
use crate::auth::middleware::{require_role, AdminAccount, AuthAccount, AuthState, FromRef};
use crate::storage::{CreateStudentRow, StorageBackend, StorageError, StudentRow, UpdateStudent};

/// Roles allowed to read student profiles
const READ_ROLES: &[Role] = &[Role::Admin, Role::Teacher];

/// App state for student routes
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

/// Request to create a student profile
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Request to update a student profile. Only provided fields change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Create student routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/students", post(create_student).get(list_students))
        .route(
            "/students/:student_id",
            get(get_student)
                .patch(update_student)
                .delete(delete_student),
        )
        .with_state(state)
}

/// GET /students - List student profiles
#[utoipa::path(
    get,
    path = "/students",
    params(
        ("page" = Option<i64>, Query, description = "1-based page number"),
        ("perPage" = Option<i64>, Query, description = "Page size, capped at 100")
    ),
    responses(
        (status = 200, description = "Page of students", body = ListResponse<StudentProfile>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed")
    ),
    security(("bearer" = [])),
    tag = "students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    account: AuthAccount,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<StudentProfile>>, ApiError> {
    require_role(&account, READ_ROLES).map_err(auth_error)?;

    let (limit, offset) = query.limit_offset();
    let rows = state
        .db
        .list_students(limit, offset)
        .await
        .map_err(storage_error)?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(row_to_profile).collect(),
    )))
}

/// POST /students - Create a student profile
#[utoipa::path(
    post,
    path = "/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentProfile),
        (status = 400, description = "Duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer" = [])),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentProfile>), ApiError> {
    let row = state
        .db
        .create_student(CreateStudentRow {
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

/// GET /students/{student_id} - Get a student profile
#[utoipa::path(
    get,
    path = "/students/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentProfile),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    account: AuthAccount,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentProfile>, ApiError> {
    require_role(&account, READ_ROLES).map_err(auth_error)?;

    let row = state
        .db
        .get_student(student_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(not_found)?;

    Ok(Json(row_to_profile(row)))
}

/// PATCH /students/{student_id} - Update a student profile
#[utoipa::path(
    patch,
    path = "/students/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentProfile),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(student_id): Path<Uuid>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<StudentProfile>, ApiError> {
    let row = state
        .db
        .update_student(
            student_id,
            UpdateStudent {
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

/// DELETE /students/{student_id} - Delete a student profile
#[utoipa::path(
    delete,
    path = "/students/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
    Path(student_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_student(student_id)
        .await
        .map_err(storage_error)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

fn row_to_profile(row: StudentRow) -> StudentProfile {
    StudentProfile {
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
        Json(ErrorResponse::new("Student not found")),
    )
}

fn storage_error(err: StorageError) -> ApiError {
    match err {
        StorageError::DuplicateEmail => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("A student with this email already exists")),
        ),
        other => {
            tracing::error!("student storage failure: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
        }
    }
}
