// Common DTOs for the public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Status + JSON error body, the error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Convert a gate rejection into the common handler error shape
pub fn auth_error(err: AuthError) -> ApiError {
    (err.status, Json(ErrorResponse::new(err.error)))
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

/// Pagination query parameters for list endpoints
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number
    #[serde(default)]
    pub page: Option<i64>,
    /// Page size, capped at 100
    #[serde(default)]
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Resolve to a (limit, offset) pair with defaults and caps applied
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1) * per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery {
            page: None,
            per_page: None,
        };
        assert_eq!(query.limit_offset(), (20, 0));
    }

    #[test]
    fn test_page_query_offsets() {
        let query = PageQuery {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(query.limit_offset(), (10, 20));
    }

    #[test]
    fn test_page_query_caps_and_floors() {
        let query = PageQuery {
            page: Some(0),
            per_page: Some(5000),
        };
        assert_eq!(query.limit_offset(), (100, 0));
    }
}
