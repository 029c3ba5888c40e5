// Dashboard count routes
//
// The derived aggregates the dashboard home page shows: entity totals and the
// per-gender student tally. Admin-only.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use super::common::{ApiError, ErrorResponse};
use crate::auth::middleware::{AdminAccount, AuthState, FromRef};
use crate::storage::{StorageBackend, StorageError};

/// App state for stats routes
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

/// One gender bucket in the student tally
#[derive(Debug, Serialize, ToSchema)]
pub struct GenderCount {
    /// Bucket label; profiles without a recorded gender fall under "unknown"
    pub gender: String,
    pub count: i64,
}

/// Entity counts for the dashboard
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountsResponse {
    pub accounts: i64,
    pub students: i64,
    pub teachers: i64,
    pub student_genders: Vec<GenderCount>,
}

/// Create stats routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/stats/counts", get(get_counts))
        .with_state(state)
}

/// GET /stats/counts - Entity and gender counts
#[utoipa::path(
    get,
    path = "/stats/counts",
    responses(
        (status = 200, description = "Current counts", body = CountsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer" = [])),
    tag = "stats"
)]
pub async fn get_counts(
    State(state): State<AppState>,
    AdminAccount(_admin): AdminAccount,
) -> Result<Json<CountsResponse>, ApiError> {
    let accounts = state.db.count_accounts().await.map_err(storage_error)?;
    let students = state.db.count_students().await.map_err(storage_error)?;
    let teachers = state.db.count_teachers().await.map_err(storage_error)?;
    let genders = state
        .db
        .count_students_by_gender()
        .await
        .map_err(storage_error)?;

    Ok(Json(CountsResponse {
        accounts,
        students,
        teachers,
        student_genders: genders
            .into_iter()
            .map(|row| GenderCount {
                gender: row.gender.unwrap_or_else(|| "unknown".to_string()),
                count: row.count,
            })
            .collect(),
    }))
}

fn storage_error(err: StorageError) -> ApiError {
    tracing::error!("stats storage failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}
