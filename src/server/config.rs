use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://robopedia.db?mode=rwc";
const DEFAULT_JWT_SECRET: &str = "robopedia-insecure-development-secret";
const DEFAULT_ADMIN_EMAIL: &str = "admin@robopedia.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const GITHUB_API_URL: &str = "https://api.github.com";

/// Settings for publishing catalog exports to a GitHub repository.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: String,
    /// Repository in `owner/name` form.
    pub repo: String,
    pub branch: String,
    pub data_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,

    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,

    pub upload_dir: String,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    pub cors_origin: Option<String>,

    pub admin_email: String,
    pub admin_password: String,

    pub github: Option<GithubConfig>,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// Every setting has a fallback so a development checkout starts without a `.env`
    /// file. The secret fallbacks are not safe for deployment and are reported at
    /// warn level when used.
    ///
    /// # Returns
    /// - `Ok(Config)` - Loaded configuration
    /// - `Err(AppError::ConfigErr(_))` - A variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, AppError> {
        let github = match (var("GITHUB_TOKEN"), var("GITHUB_REPO")) {
            (Some(token), Some(repo)) => Some(GithubConfig {
                api_url: var("GITHUB_API_URL").unwrap_or_else(|| GITHUB_API_URL.to_string()),
                token,
                repo,
                branch: var("GITHUB_BRANCH").unwrap_or_else(|| "main".to_string()),
                data_path: var("GITHUB_DATA_PATH")
                    .unwrap_or_else(|| "data/robots.json".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            port: try_load("PORT", "5000")?,
            database_url: load_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret: insecure_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            jwt_expiry_hours: try_load("JWT_EXPIRY_HOURS", "720")?,
            upload_dir: load_or("UPLOAD_DIR", "uploads"),
            static_dir: load_or("STATIC_DIR", "public"),
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "26214400")?,
            cors_origin: var("CORS_ORIGIN"),
            admin_email: insecure_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
            admin_password: insecure_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            github,
        })
    }
}

impl Default for Config {
    /// Built-in fallback values without reading the environment.
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiry_hours: 720,
            upload_dir: "uploads".to_string(),
            static_dir: "public".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
            cors_origin: None,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            github: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn load_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn insecure_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        warn!("{key} not set, falling back to an insecure built-in value");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    load_or(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
