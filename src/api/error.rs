//! API error response types

use crate::api::dto::ErrorResponse;
use crate::error::ServerError;
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};

impl From<QueryRejection> for ServerError {
    fn from(e: QueryRejection) -> Self {
        ServerError::InvalidArgument(format!("invalid query: {}", e.body_text()))
    }
}

impl From<PathRejection> for ServerError {
    fn from(e: PathRejection) -> Self {
        ServerError::InvalidArgument(format!("invalid path: {}", e.body_text()))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            kind: self.kind().as_str().to_string(),
            recoverable: self.is_recoverable(),
        };

        (status, Json(body)).into_response()
    }
}
