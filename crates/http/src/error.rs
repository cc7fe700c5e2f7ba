//! Error taxonomy for the catalog HTTP layer.
//!
//! Handlers and services raise a classified [`ApiError`]; the boundary is the
//! `IntoResponse` impl, which logs the failure and emits the uniform error
//! envelope `{"status": "error", "message": ...}` with the classification
//! carried by the HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application error types that map to HTTP responses.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input, a missing reference in the request body, or an
    /// update with nothing to do. 400 covers several distinct client
    /// mistakes in this API.
    #[error("{message}")]
    BadRequest { message: String },

    /// Fetch-one target does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// Duplicate value for a unique field (email, isbn).
    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    /// Store-level UNIQUE violations classify as Conflict; the application
    /// pre-checks uniqueness, but two concurrent writers can both pass the
    /// check and the losing insert must still surface as 409.
    fn from(err: sqlx::Error) -> Self {
        if catalog_db::is_unique_violation(&err) {
            Self::Conflict {
                message: "Duplicate value for a unique field".to_string(),
            }
        } else {
            Self::Internal(err.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();

        let (status, message) = match self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict { message } => (StatusCode::CONFLICT, message),
            ApiError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            message = %message,
            "request error"
        );

        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "Something went wrong".to_string()
        } else {
            message
        };

        let body = json!({
            "status": "error",
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::bad_request("missing field").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::not_found("no such book").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = ApiError::conflict("duplicate isbn").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_maps_to_500() {
        let err = ApiError::Internal(anyhow::anyhow!("database unreachable"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn row_not_found_is_not_a_conflict() {
        let db = catalog_db::Db::in_memory().await.unwrap();
        let err = db
            .execute("INSERT INTO missing_table (x) VALUES (?)", vec![])
            .await
            .unwrap_err();

        match ApiError::from(err) {
            ApiError::Internal(_) => {}
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
