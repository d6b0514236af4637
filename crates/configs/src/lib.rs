//! # configs
//!
//! Application configuration. Values come from built-in defaults, then a
//! `.env` file (if present), then `SOCIAL__*` environment variables, e.g.
//! `SOCIAL__SERVER__PORT=8080` or `SOCIAL__DATABASE__URL=postgres://...`.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "SOCIAL";
const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Unset means the in-memory store.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub token_ttl_secs: i64,
    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Builds the config from defaults overlaid with `source`. Split out of
    /// [`AppConfig::load`] so tests can feed values without touching the
    /// process environment.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg: AppConfig = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.jwt_secret", DEV_JWT_SECRET)?
            .set_default("auth.token_ttl_secs", 360_000)?
            // argon2 crate defaults (OWASP minimum for Argon2id)
            .set_default("auth.hash_memory_kib", 19_456)?
            .set_default("auth.hash_iterations", 2)?
            .set_default("auth.hash_parallelism", 1)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_secs must be positive".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be positive".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn uses_dev_secret(&self) -> bool {
        use secrecy::ExposeSecret;
        self.auth.jwt_secret.expose_secret() == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use secrecy::ExposeSecret;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_source(File::from_str(toml, FileFormat::Toml))
    }

    #[test]
    fn test_defaults() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert!(cfg.database.url.is_none());
        assert_eq!(cfg.auth.hash_iterations, 2);
        assert!(cfg.uses_dev_secret());
        assert!(!cfg.logging.json);
    }

    #[test]
    fn test_overrides() {
        let cfg = from_toml(
            r#"
            [server]
            port = 8080
            [database]
            url = "postgres://u:p@localhost/social"
            [auth]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(
            cfg.database.url.as_ref().map(|u| u.expose_secret().to_string()),
            Some("postgres://u:p@localhost/social".to_string())
        );
        assert!(!cfg.uses_dev_secret());
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let cfg = from_toml("[auth]\njwt_secret = \"hunter22\"").unwrap();
        assert!(!format!("{cfg:?}").contains("hunter22"));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert!(matches!(
            from_toml("[auth]\ntoken_ttl_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
