//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_BCRYPT_COST, DEFAULT_INVITATION_TTL_DAYS, DEFAULT_TOKEN_EXPIRY_SECS, DEV_JWT_SECRET,
    MAX_INVITATION_TTL_DAYS, MAX_TOKEN_EXPIRY_SECS,
};
use crate::error::AppError;
use crate::i18n::Locale;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub security: SecuritySettings,
    pub rate_limit: RateLimitSettings,
    pub cors: CorsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub locale: Locale,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub token_expiry_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    pub bcrypt_cost: u32,
    pub invitation_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub auth_requests_per_minute: u32,
    pub burst: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Directory for daily rolling log files. Stdout only when unset.
    pub directory: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder_with_defaults()?
            .set_override("app.env", env.clone())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SPHERE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            // Variables understood by earlier deployments of the service
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option(
                "app.port",
                std::env::var("PORT").ok().and_then(|p| p.parse::<i64>().ok()),
            )?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration built from defaults only, ignoring files and environment.
    pub fn defaults() -> Result<Self, AppError> {
        let config: AppConfig = Self::builder_with_defaults()?.build()?.try_deserialize()?;
        Ok(config)
    }

    fn builder_with_defaults(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 4000)?
            .set_default("app.name", "sphere-server")?
            .set_default("app.locale", "ja")?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "postgres://postgres:postgres@db:5432/sphere")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.secret", DEV_JWT_SECRET)?
            .set_default("jwt.token_expiry_secs", DEFAULT_TOKEN_EXPIRY_SECS)?
            .set_default("security.bcrypt_cost", DEFAULT_BCRYPT_COST)?
            .set_default("security.invitation_ttl_days", DEFAULT_INVITATION_TTL_DAYS)?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.auth_requests_per_minute", 30)?
            .set_default("rate_limit.burst", 10)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            .set_default("log.format", "json")
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.app.port == 0 {
            return Err(AppError::InvalidConfig("app.port must be non-zero".into()));
        }
        if self.jwt.secret.is_empty() {
            return Err(AppError::InvalidConfig("jwt.secret must not be empty".into()));
        }
        if self.is_production() && self.jwt.secret == DEV_JWT_SECRET {
            return Err(AppError::InvalidConfig(
                "jwt.secret must be changed in production".into(),
            ));
        }
        if !(1..=MAX_TOKEN_EXPIRY_SECS).contains(&self.jwt.token_expiry_secs) {
            return Err(AppError::InvalidConfig(format!(
                "jwt.token_expiry_secs must be between 1 and {}",
                MAX_TOKEN_EXPIRY_SECS
            )));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(AppError::InvalidConfig(
                "security.bcrypt_cost must be between 4 and 31".into(),
            ));
        }
        if !(1..=MAX_INVITATION_TTL_DAYS).contains(&self.security.invitation_ttl_days) {
            return Err(AppError::InvalidConfig(format!(
                "security.invitation_ttl_days must be between 1 and {}",
                MAX_INVITATION_TTL_DAYS
            )));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::InvalidConfig(
                "database.min_connections exceeds database.max_connections".into(),
            ));
        }
        Ok(())
    }
}
