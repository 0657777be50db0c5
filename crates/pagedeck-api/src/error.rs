use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            ApiError::Database(err) => tracing::error!("Database error: {err}"),
        }

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = json!({
            "error": {
                "message": "An internal error occurred",
                "statusCode": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
