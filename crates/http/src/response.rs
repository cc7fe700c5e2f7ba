//! Success envelope for the catalog API: `{ msg, data?, pagination? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Pagination echo on list responses. `count` is the number of rows on the
/// returned page, not the total across all pages.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub count: usize,
}

/// Uniform success body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl ApiResponse<()> {
    /// Body with a message only.
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(msg: impl Into<String>, data: T) -> Self {
        Self {
            msg: msg.into(),
            data: Some(data),
            pagination: None,
        }
    }

    pub fn with_pagination(msg: impl Into<String>, data: T, pagination: Pagination) -> Self {
        Self {
            msg: msg.into(),
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Empty list results are a successful no-content outcome, not an error.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_body_omits_data_and_pagination() {
        let body = serde_json::to_value(ApiResponse::message("Author created successfully"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "msg": "Author created successfully" })
        );
    }

    #[test]
    fn paginated_body_carries_page_limit_count() {
        let response = ApiResponse::with_pagination(
            "Books retrieved successfully",
            vec![1, 2, 3],
            Pagination {
                page: 2,
                limit: 10,
                count: 3,
            },
        );
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["pagination"]["count"], 3);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn no_content_has_204_status() {
        assert_eq!(no_content().status(), StatusCode::NO_CONTENT);
    }
}
