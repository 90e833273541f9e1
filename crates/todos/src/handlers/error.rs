use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use todos_core::storage::{storage_error_to_status_code, StorageError};

/// Catch-all error for failures a handler cannot recover from.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(storage_error) = self.0.downcast_ref::<StorageError>() {
            let code = storage_error_to_status_code(storage_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        tracing::error!(error = %self.0, status = %status_code, "Request failed");

        (
            status_code,
            format!("Sorry there was a nasty error - {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
