use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request broke a business rule; the caller can fix and retry.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] DbError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository(e) if e.is_not_found())
    }
}

impl From<core_types::CoreError> for ServiceError {
    fn from(err: core_types::CoreError) -> Self {
        match err {
            core_types::CoreError::Validation(message) => ServiceError::Validation(message),
        }
    }
}
