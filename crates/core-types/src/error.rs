use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A business rule was violated by caller-supplied data.
    #[error("{0}")]
    Validation(String),
}
