use actix_web::cookie::SameSite;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{JobBoardError, Result};

pub const DEFAULT_PORT: u16 = 7000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = JobBoardError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(JobBoardError::Config(format!(
                "unknown database backend '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
    pub database_name: String,
    pub backend: StoreBackend,
    pub token_secret: Option<String>,
    pub production: bool,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_user: None,
            db_pass: None,
            database_name: "workAtlas".to_string(),
            backend: StoreBackend::Mongo,
            token_secret: None,
            production: false,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
            ],
        }
    }
}

/// Attributes of the `token` cookie, which depend on the deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_environment(production: bool) -> Self {
        if production {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| JobBoardError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| JobBoardError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Reads `CONFIG_PATH` (when set) and then applies process environment overrides.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load_from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| JobBoardError::Config(format!("invalid PORT '{}'", port)))?;
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.mongodb_uri = uri;
        }
        if let Some(user) = lookup("DB_USER") {
            self.db_user = Some(user);
        }
        if let Some(pass) = lookup("DB_PASS") {
            self.db_pass = Some(pass);
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database_name = name;
        }
        if let Some(backend) = lookup("DATABASE_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(secret) = lookup("ACCESS_TOKEN_SECRET") {
            self.token_secret = Some(secret);
        }
        if let Some(env) = lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            self.production = env.trim().eq_ignore_ascii_case("production");
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(self)
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::for_environment(self.production)
    }
}
