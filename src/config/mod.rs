use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub query: QueryConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub debug_logging: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 20,
            debug_logging: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://cityinfo.db` or `sqlite::memory:`.
    /// `memory` selects the in-process store instead of SQLite.
    pub url: String,
    pub max_connections: u32,
    pub seed_on_startup: bool,
}

impl DatabaseConfig {
    pub fn uses_memory_store(&self) -> bool {
        self.url == "memory"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: u64,
    /// City claim put into tokens minted for demo users.
    pub demo_city: String,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub to: String,
    pub from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Query overrides
        if let Ok(v) = env::var("QUERY_DEFAULT_PAGE_SIZE") {
            self.query.default_page_size = v.parse().unwrap_or(self.query.default_page_size);
        }
        if let Ok(v) = env::var("QUERY_MAX_PAGE_SIZE") {
            self.query.max_page_size = v.parse().unwrap_or(self.query.max_page_size);
        }
        if let Ok(v) = env::var("QUERY_DEBUG_LOGGING") {
            self.query.debug_logging = v.parse().unwrap_or(self.query.debug_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_SEED_ON_STARTUP") {
            self.database.seed_on_startup = v.parse().unwrap_or(self.database.seed_on_startup);
        }

        // API overrides
        if let Some(v) = env::var("CITYINFO_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_DEMO_CITY") {
            self.security.demo_city = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_TO") {
            self.mail.to = v;
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.mail.from = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            query: QueryConfig {
                default_page_size: 10,
                max_page_size: 20,
                debug_logging: true,
            },
            database: DatabaseConfig {
                url: "memory".to_string(),
                max_connections: 5,
                seed_on_startup: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: "cityinfo-development-secret-change-me".to_string(),
                jwt_issuer: "https://localhost:3000".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 1,
                demo_city: "Antwerp".to_string(),
                enable_cors: true,
            },
            mail: MailConfig {
                to: "admin@mycompany.com".to_string(),
                from: "noreply@mycompany.com".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            query: QueryConfig {
                debug_logging: false,
                ..QueryConfig::default()
            },
            database: DatabaseConfig {
                url: "sqlite://cityinfo.db".to_string(),
                max_connections: 10,
                seed_on_startup: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "https://staging.example.com".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 1,
                demo_city: "Antwerp".to_string(),
                enable_cors: true,
            },
            mail: MailConfig {
                to: "admin@mycompany.com".to_string(),
                from: "noreply@mycompany.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            query: QueryConfig::default(),
            database: DatabaseConfig {
                url: "sqlite://cityinfo.db".to_string(),
                max_connections: 20,
                seed_on_startup: false,
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "https://api.example.com".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 1,
                demo_city: "Antwerp".to_string(),
                enable_cors: false,
            },
            mail: MailConfig {
                to: "admin@mycompany.com".to_string(),
                from: "noreply@mycompany.com".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
