use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Every user-visible failure in the API. All variants are recoverable;
/// `Internal` is the only one whose detail stays out of the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("not found")]
    NotFound,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => {
                StatusCode::UNAUTHORIZED.into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_map_to_401_without_detail() {
        let resp = ApiError::InvalidCredentials.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = ApiError::Unauthenticated.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_maps_to_400() {
        let mut fields = FieldErrors::new();
        fields.insert("title".into(), vec!["This field is required.".into()]);
        let resp = ApiError::Validation(fields).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
