use std::path::PathBuf;
use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Deployment mode, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    /// Reset links are returned in the forgot-password response.
    Development,
    /// Reset links are emailed; SMTP must be configured.
    Production,
}

impl AppEnv {
    /// Parse `development`/`dev` or `production`/`prod` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(AppEnv::Development),
            "production" | "prod" => Some(AppEnv::Production),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded attachments are written to and served from.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes (default: 25 MiB).
    pub max_upload_bytes: usize,
    /// Base URL of the web client, used to build reset links.
    pub frontend_url: String,
    /// Deployment mode.
    pub app_env: AppEnv,
    /// Minimum accepted length for a new password (default: `8`).
    pub min_password_length: usize,
    /// JWT session token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `MAX_UPLOAD_BYTES`     | `26214400`                 |
    /// | `FRONTEND_URL`         | `http://localhost:3000`    |
    /// | `APP_ENV`              | `production`               |
    /// | `MIN_PASSWORD_LENGTH`  | `8`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let app_env = std::env::var("APP_ENV")
            .map(|v| AppEnv::parse(&v).expect("APP_ENV must be 'development' or 'production'"))
            .unwrap_or(AppEnv::Production);

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            max_upload_bytes,
            frontend_url,
            app_env,
            min_password_length,
            jwt,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `DATABASE_URL`            | **yes**  | --      |
    /// | `DB_MAX_CONNECTIONS`      | no       | `10`    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | no       | `5`     |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        }
    }
}

/// Default admin account created when the `users` table is empty.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    /// `ADMIN_USERNAME` (default: `admin`).
    pub username: String,
    /// `ADMIN_EMAIL`, needed for password reset by email.
    pub email: Option<String>,
    /// `ADMIN_PASSWORD`. Seeding is skipped when unset.
    pub password: Option<String>,
}

impl AdminSeedConfig {
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            email: std::env::var("ADMIN_EMAIL").ok().filter(|e| !e.is_empty()),
            password: std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parses_aliases() {
        assert_eq!(AppEnv::parse("Development"), Some(AppEnv::Development));
        assert_eq!(AppEnv::parse("dev"), Some(AppEnv::Development));
        assert_eq!(AppEnv::parse(" prod "), Some(AppEnv::Production));
        assert_eq!(AppEnv::parse("staging"), None);
    }
}
