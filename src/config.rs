//! # Configuration
//!
//! Layered application configuration: an optional `config.{toml,yaml,...}`
//! file overlaid with `RFQ_`-prefixed environment variables (for example
//! `RFQ_SERVER__PORT=9000`). A `.env` file is honored by the binary via
//! dotenvy before loading.

use serde::Deserialize;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns the bind address as `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bearer-token verification settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity system.
    pub jwt_secret: String,
}

/// Development fallback; the binary warns loudly when it is in use.
pub const DEV_JWT_SECRET: &str = "dev-secret";

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
        }
    }
}

/// Catalog collaborator settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog service; in-memory stub when unset.
    pub base_url: Option<String>,
}

/// Identity directory settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Base URL of the identity service; in-memory stub when unset.
    pub base_url: Option<String>,
}

/// Database settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; in-memory storage when unset.
    pub url: Option<String>,
}

/// Messaging settings, used by the `nats` feature.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    /// NATS server URL; events go to the log when unset.
    pub url: Option<String>,
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Bearer-token verification.
    pub auth: AuthConfig,
    /// Catalog collaborator.
    pub catalog: CatalogConfig,
    /// Identity directory.
    pub identity: IdentityConfig,
    /// Database backend.
    pub database: DatabaseConfig,
    /// Messaging backend.
    pub nats: NatsConfig,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// # Errors
    ///
    /// Returns `config::ConfigError` if a source is malformed.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("RFQ").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.addr(), "0.0.0.0:8080");
        assert_eq!(cfg.auth.jwt_secret, DEV_JWT_SECRET);
        assert!(cfg.database.url.is_none());
        assert!(cfg.catalog.base_url.is_none());
    }

    #[test]
    fn deserializes_partial_sources() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "database": {"url": "postgres://x"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.database.url.as_deref(), Some("postgres://x"));
    }
}
