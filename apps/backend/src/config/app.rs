//! Application configuration loaded from environment variables.
//!
//! Everything the process needs from its environment is read once, at
//! startup, into [`AppConfig`]. Nothing else in the crate calls `std::env`.
//! A `.env` file, when present, fills in variables the process environment
//! does not already set.

use std::env;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Dev,
    Test,
}

impl RuntimeEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeEnv::Prod => "prod",
            RuntimeEnv::Dev => "dev",
            RuntimeEnv::Test => "test",
        }
    }
}

impl FromStr for RuntimeEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(RuntimeEnv::Prod),
            "dev" | "development" => Ok(RuntimeEnv::Dev),
            "test" => Ok(RuntimeEnv::Test),
            other => Err(AppError::config(format!(
                "APP_ENV must be one of prod, dev, test; got '{other}'"
            ))),
        }
    }
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_JSON_PAYLOAD_BYTES: usize = 16 * 1024;

/// Centralized application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server configuration
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,

    // Security configuration; resolved through `SecurityConfig::resolve`
    pub jwt_secret: Option<String>,

    // Persistence; the in-memory user store is used when unset
    pub database_url: Option<String>,

    // CORS
    pub cors_allowed_origins: Vec<String>,

    // HTTP payload limits
    pub max_json_payload_size: usize,
}

impl AppConfig {
    /// Load `.env` from the working directory (or a parent), then read the
    /// process environment.
    pub fn load() -> Result<Self, AppError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(AppError::config(format!("failed to read .env: {e}"))),
        }
        Self::from_env()
    }

    /// Like [`load`](Self::load) with an explicit env file, which must exist.
    pub fn load_from(env_file: &Path) -> Result<Self, AppError> {
        dotenvy::from_path(env_file).map_err(|e| {
            AppError::config(format!("failed to read {}: {e}", env_file.display()))
        })?;
        Self::from_env()
    }

    /// Load and validate all configuration from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let runtime_env = match non_empty("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => RuntimeEnv::Prod,
        };

        let host = non_empty("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty("BACKEND_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let max_json_payload_size = match non_empty("MAX_JSON_PAYLOAD_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AppError::config(format!(
                    "MAX_JSON_PAYLOAD_BYTES must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_MAX_JSON_PAYLOAD_BYTES,
        };

        Ok(Self {
            host,
            port,
            runtime_env,
            jwt_secret: non_empty("JWT_SECRET"),
            database_url: non_empty("DATABASE_URL"),
            cors_allowed_origins: parse_origins(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            max_json_payload_size,
        })
    }

    /// Security settings for this configuration (see [`SecurityConfig::resolve`]).
    pub fn security(&self) -> Result<SecurityConfig, AppError> {
        SecurityConfig::resolve(self.jwt_secret.as_deref(), self.runtime_env)
    }
}

/// Parse comma-separated origins, keeping only http(s) entries and
/// falling back to localhost when nothing valid was configured.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.runtime_env, RuntimeEnv::Prod);
        assert!(config.jwt_secret.is_none());
        assert!(config.database_url.is_none());
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("APP_ENV", "dev"),
            ("BACKEND_HOST", "127.0.0.1"),
            ("BACKEND_PORT", "9000"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/users"),
            ("CORS_ALLOWED_ORIGINS", "https://app.example.com, null, ftp://x, http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.runtime_env, RuntimeEnv::Dev);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/users"));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://app.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = config_from(&[("BACKEND_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn unknown_app_env_is_a_config_error() {
        assert!(config_from(&[("APP_ENV", "staging")]).is_err());
        assert_eq!(
            config_from(&[("APP_ENV", " Production ")]).unwrap().runtime_env,
            RuntimeEnv::Prod
        );
    }

    #[test]
    fn blank_secret_counts_as_unset() {
        let config = config_from(&[("JWT_SECRET", "  "), ("APP_ENV", "prod")]).unwrap();
        assert!(config.jwt_secret.is_none());
        assert!(config.security().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn from_env_reads_the_process_environment() {
        std::env::set_var("BACKEND_PORT", "8181");
        std::env::set_var("APP_ENV", "test");
        let config = AppConfig::from_env();
        std::env::remove_var("BACKEND_PORT");
        std::env::remove_var("APP_ENV");

        let config = config.unwrap();
        assert_eq!(config.port, 8181);
        assert_eq!(config.runtime_env, RuntimeEnv::Test);
    }

    #[test]
    #[serial_test::serial]
    fn env_file_fills_unset_variables_only() {
        let dir = std::env::temp_dir().join(format!("user-api-env-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join(".env");
        std::fs::write(
            &env_file,
            "JWT_SECRET=secret-from-env-file\nBACKEND_PORT=9191\nAPP_ENV=prod\n",
        )
        .unwrap();

        std::env::set_var("BACKEND_PORT", "8282");
        let config = AppConfig::load_from(&env_file);
        let security = config.as_ref().ok().map(|c| c.security());
        for name in ["JWT_SECRET", "BACKEND_PORT", "APP_ENV"] {
            std::env::remove_var(name);
        }
        std::fs::remove_dir_all(&dir).unwrap();

        let config = config.unwrap();
        assert_eq!(config.jwt_secret.as_deref(), Some("secret-from-env-file"));
        assert_eq!(config.port, 8282, "process environment wins over .env");
        assert!(security.unwrap().is_ok(), "prod secret check passes");
    }

    #[test]
    #[serial_test::serial]
    fn missing_env_file_is_a_config_error() {
        let missing = std::env::temp_dir().join("user-api-no-such-dir").join(".env");
        let err = AppConfig::load_from(&missing).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
