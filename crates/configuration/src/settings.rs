use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub api: ApiSettings,
}

/// Which product store implementation the server is wired with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The `product` table in PostgreSQL.
    #[default]
    Postgres,
    /// A process-local store, lost on exit.
    Memory,
}

/// Connection parameters for the PostgreSQL pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long an idle connection is kept before the pool closes it.
    pub max_connection_idle_time_secs: u64,
    /// How long a request waits for a free connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Postgres,
            host: "localhost".to_string(),
            port: 6432,
            name: "productapp".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            max_connections: 10,
            max_connection_idle_time_secs: 30,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseSettings {
    /// The connection URL. `DATABASE_URL` wins over the individual fields when set.
    pub fn connection_url(&self) -> String {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.max_connection_idle_time_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("invalid server address: {e}")))
    }
}

/// Behaviour switches for the product API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// When set, a price update on an unknown id fails with not-found instead of
    /// succeeding silently, and update failures reach the HTTP caller.
    pub strict_price_update: bool,
}

impl Settings {
    /// Rejects settings that would only fail later, at connection time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == Backend::Postgres {
            if self.database.host.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.host must not be empty".to_string(),
                ));
            }
            if self.database.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database.name must not be empty".to_string(),
                ));
            }
            if self.database.max_connections == 0 {
                return Err(ConfigError::ValidationError(
                    "database.max_connections must be at least 1".to_string(),
                ));
            }
        }
        self.server.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_settings_from;
    use std::io::Write;

    #[test]
    fn defaults_match_local_setup() {
        let settings = Settings::default();
        assert_eq!(settings.database.port, 6432);
        assert_eq!(settings.database.name, "productapp");
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.database.idle_timeout(), Duration::from_secs(30));
        assert!(!settings.api.strict_price_update);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_connections_is_rejected() {
        let mut settings = Settings::default();
        settings.database.max_connections = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn memory_backend_skips_database_checks() {
        let mut settings = Settings::default();
        settings.database.backend = Backend::Memory;
        settings.database.host = String::new();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nbackend = \"memory\"\nmax_connections = 3\n\n[server]\nport = 9000\n\n[api]\nstrict_price_update = true"
        )
        .unwrap();

        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.database.backend, Backend::Memory);
        assert_eq!(settings.database.max_connections, 3);
        assert_eq!(settings.database.host, "localhost");
        assert_eq!(settings.server.port, 9000);
        assert!(settings.api.strict_price_update);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings_from(std::path::Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
