use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Establishes a connection pool to the PostgreSQL database.
///
/// Each repository call borrows one connection from this pool for the lifetime of a
/// single statement. The pool can be cloned freely and shared across requests.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.max_connections == 0 {
        return Err(DbError::ConnectionConfigError(
            "max_connections must be at least 1".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .idle_timeout(settings.idle_timeout())
        .acquire_timeout(settings.acquire_timeout())
        .connect(&settings.connection_url())
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(
        host = %settings.host,
        database = %settings.name,
        max_connections = settings.max_connections,
        "Connected to PostgreSQL."
    );
    Ok(pool)
}
