//! API error responses

use crate::search::SearchError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by a handler, rendered as the failure envelope
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request field (400)
    Validation(String),
    /// Lookup matched nothing (404)
    NotFound(String),
    /// Secret store, connection or query failure (500)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(message) => ApiError::Validation(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(message) => json!({ "success": false, "message": message }),
            ApiError::Validation(message) | ApiError::Internal(message) => {
                json!({ "success": false, "error": message })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretError;
    use crate::store::StoreError;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = SearchError::Validation("bad".into()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let secret: ApiError = SearchError::Secret(SecretError::NotFound("s".into())).into();
        assert_eq!(secret.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let store: ApiError = SearchError::Store(StoreError::Connection("down".into())).into();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_message_is_error_display() {
        let err: ApiError = SearchError::Store(StoreError::Connection("down".into())).into();
        match err {
            ApiError::Internal(message) => assert_eq!(message, "Failed to connect to MongoDB: down"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
