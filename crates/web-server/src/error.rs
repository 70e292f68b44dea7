use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use service::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The request could not be read: bad JSON, bad path or query parameters.
    #[error("{0}")]
    Bind(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Repository(String),
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "errorDescription")]
    pub error_description: String,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => AppError::Validation(message),
            e if e.is_not_found() => AppError::NotFound(e.to_string()),
            ServiceError::Repository(db_err) => {
                tracing::error!(error = ?db_err, "Repository error.");
                AppError::Repository(db_err.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Bind(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) | AppError::Repository(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error_description: self.to_string(),
        });
        (status, body).into_response()
    }
}
