use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use services::services::task_move::TaskMoveError;
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    TaskMove(#[from] TaskMoveError),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::TaskMove(err) => match err {
                TaskMoveError::TaskNotFound(_) | TaskMoveError::ListNotFound(_) => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                TaskMoveError::InvalidDropTarget(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                TaskMoveError::Database(_) => {
                    error!("task move failed: {err}");
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
            ApiError::Database(err) => {
                error!("database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
