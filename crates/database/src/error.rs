use core_types::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load settings for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Product not found with id {0}")]
    NotFound(ProductId),

    /// A statement failed to execute. `context` names the operation and id.
    #[error("{context}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to map product row: {0}")]
    RowMapping(#[source] sqlx::Error),

    /// The store refused the operation for a reason other than the database driver.
    #[error("Product store unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    pub(crate) fn query(context: impl Into<String>, source: sqlx::Error) -> Self {
        DbError::Query {
            context: context.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}
