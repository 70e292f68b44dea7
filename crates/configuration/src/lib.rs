use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiSettings, Backend, DatabaseSettings, ServerSettings, Settings};

/// The default configuration file, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application settings from `config.toml` and the environment.
///
/// The file is optional: every field has a default matching a local development
/// setup. Environment variables prefixed with `APP` override file values, using `__`
/// as the nesting separator (`APP__DATABASE__HOST=db`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Same as [`load_settings`] but reads the given file instead of `config.toml`.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    // A missing .env is fine; it only ever supplies DATABASE_URL.
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(
        backend = ?settings.database.backend,
        host = %settings.database.host,
        port = settings.database.port,
        "Configuration loaded."
    );
    Ok(settings)
}
