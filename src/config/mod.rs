use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub statement_timeout_ms: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

/// The single service-account identity plus token settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub username: String,
    pub password: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub token_header: String,
    pub cors_origins: Vec<String>,
}

// Secrets stay out of Debug output so the config can be logged.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("token_header", &self.token_header)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub store_url: String,
    pub prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        // Credentials and signing secret
        if let Ok(v) = env::var("USER_NAME") {
            self.security.username = v;
        }
        if let Ok(v) = env::var("USER_PASSWORD") {
            self.security.password = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }
        if let Ok(v) = env::var("TOKEN_HEADER") {
            self.security.token_header = v.trim().to_ascii_lowercase();
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_DEFAULT_PAGE_SIZE") {
            self.filter.default_page_size = v.parse().unwrap_or(self.filter.default_page_size);
        }
        if let Ok(v) = env::var("FILTER_MAX_PAGE_SIZE") {
            self.filter.max_page_size = v.parse().unwrap_or(self.filter.max_page_size);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_STATEMENT_TIMEOUT_MS") {
            self.database.statement_timeout_ms = v.parse().unwrap_or(self.database.statement_timeout_ms);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Export overrides
        if let Ok(v) = env::var("EXPORT_STORE_URL") {
            self.export.store_url = v;
        }
        if let Ok(v) = env::var("EXPORT_PREFIX") {
            self.export.prefix = v.trim_matches('/').to_string();
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.username.is_empty() {
            return Err(ConfigError::Missing("USER_NAME"));
        }
        if self.security.password.is_empty() {
            return Err(ConfigError::Missing("USER_PASSWORD"));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }
        if self.security.token_header.is_empty() {
            return Err(ConfigError::Missing("TOKEN_HEADER"));
        }
        if self.filter.default_page_size < 1 || self.filter.max_page_size < self.filter.default_page_size {
            return Err(ConfigError::Invalid {
                name: "FILTER_MAX_PAGE_SIZE",
                reason: format!(
                    "default page size {} must be within 1..={}",
                    self.filter.default_page_size, self.filter.max_page_size
                ),
            });
        }
        if self.database.statement_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "DATABASE_STATEMENT_TIMEOUT_MS",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            filter: FilterConfig {
                default_page_size: 100,
                max_page_size: 1000,
            },
            database: DatabaseConfig {
                url: "sqlite://manage.db?mode=rwc".to_string(),
                max_connections: 5,
                statement_timeout_ms: 5000,
                enable_query_logging: true,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                username: String::new(),
                password: String::new(),
                jwt_secret: String::new(),
                token_ttl_secs: 2 * 60 * 60,
                token_header: "token".to_string(),
                cors_origins: vec![],
            },
            export: ExportConfig {
                store_url: "memory://".to_string(),
                prefix: "export".to_string(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.database.statement_timeout_ms = 3000;
        config.export.store_url = "file:///var/lib/manage-api/export".to_string();
        config
    }

    fn production() -> Self {
        let mut config = Self::staging();
        config.environment = Environment::Production;
        config.filter.max_page_size = 500;
        config.database.max_connections = 20;
        config.database.enable_query_logging = false;
        config
    }
}
