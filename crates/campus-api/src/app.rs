// Router assembly
//
// Builds the complete application router from a storage backend and auth
// configuration. main() layers CORS and request tracing on top; tests drive
// this router directly with tower::ServiceExt::oneshot.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use campus_core::{Account, Role, StudentProfile, TeacherProfile};

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use crate::auth::{self, AuthConfig, AuthService, AuthState, TokenService};
use crate::storage::StorageBackend;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// State for the health endpoint
#[derive(Clone)]
struct HealthState {
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
    })
}

/// Registers the bearer security scheme referenced by the path annotations
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register,
        auth::routes::login,
        auth::routes::me,
        api::students::create_student,
        api::students::list_students,
        api::students::get_student,
        api::students::update_student,
        api::students::delete_student,
        api::teachers::create_teacher,
        api::teachers::list_teachers,
        api::teachers::get_teacher,
        api::teachers::update_teacher,
        api::teachers::delete_teacher,
        api::stats::get_counts,
    ),
    components(
        schemas(
            Account, Role, StudentProfile, TeacherProfile,
            auth::routes::RegisterRequest, auth::routes::LoginRequest,
            auth::routes::AuthResponse,
            api::students::CreateStudentRequest, api::students::UpdateStudentRequest,
            api::teachers::CreateTeacherRequest, api::teachers::UpdateTeacherRequest,
            api::stats::CountsResponse, api::stats::GenderCount,
            ErrorResponse,
            ListResponse<StudentProfile>,
            ListResponse<TeacherProfile>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and identity endpoints"),
        (name = "students", description = "Student profile endpoints"),
        (name = "teachers", description = "Teacher profile endpoints"),
        (name = "stats", description = "Dashboard count endpoints")
    ),
    info(
        title = "Campus API",
        version = "0.2.0",
        description = "School-management API: credential auth core with role-gated resource routes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Build the full application router
pub fn build_app(db: StorageBackend, auth_config: &AuthConfig) -> Router {
    let tokens = Arc::new(TokenService::new(&auth_config.jwt));
    let auth_service = Arc::new(AuthService::new(db.clone(), tokens.clone()));
    let auth_state = AuthState {
        tokens,
        service: auth_service,
    };

    let students_state = api::students::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let teachers_state = api::teachers::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let stats_state = api::stats::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let health_state = HealthState {
        storage: if db.is_dev_mode() { "memory" } else { "postgres" },
    };

    Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(auth::routes(auth_state))
        .merge(api::students::routes(students_state))
        .merge(api::teachers::routes(teachers_state))
        .merge(api::stats::routes(stats_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["info"]["title"], "Campus API");
        assert!(json["paths"].get("/auth/register").is_some());
        assert!(json["paths"].get("/students").is_some());
    }
}
