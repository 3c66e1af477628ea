//! TOML-based configuration for SafeVault
//!
//! The server reads a single TOML file (`safevault.toml`) describing the
//! listener, token issuance and optional identity seeding.
//!
//! Secrets are never written in the file. Each secret is referenced by the
//! name of the environment variable that holds it (`key_env`,
//! `admin_password_env`, ...), and those variables are checked at load time.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! log_level = "info"
//! log_format = "pretty"
//!
//! [jwt]
//! issuer = "safevault"
//! audience = "safevault-clients"
//! key_env = "JWT_KEY"
//! expiry_minutes = 60
//!
//! [seed]
//! admin_email = "admin@safevault.local"
//! admin_password_env = "SAFEVAULT_ADMIN_PASSWORD"
//! user_email = "user@safevault.local"
//! user_password_env = "SAFEVAULT_USER_PASSWORD"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from safevault.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeVaultConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub jwt: JwtConfig,

    /// Seed identities created at startup; seeding is skipped when absent
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Token Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Value written to and required in the `iss` claim
    pub issuer: String,

    /// Value written to and required in the `aud` claim
    pub audience: String,

    /// Environment variable name containing the base64 signing key
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Token lifetime in minutes
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
}

fn default_key_env() -> String {
    "JWT_KEY".to_string()
}

fn default_expiry_minutes() -> i64 {
    60
}

impl JwtConfig {
    /// Token settings with the default key variable and lifetime.
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            key_env: default_key_env(),
            expiry_minutes: default_expiry_minutes(),
        }
    }

    /// Get the base64 signing key from the environment
    pub fn signing_key(&self) -> Result<String, ConfigError> {
        resolve_env(&self.key_env).ok_or_else(|| ConfigError::MissingEnvVar(self.key_env.clone()))
    }
}

// ============= Seed Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub admin_email: String,

    /// Environment variable name containing the seed admin password
    pub admin_password_env: String,

    pub user_email: String,

    /// Environment variable name containing the seed user password
    pub user_password_env: String,
}

/// Seed identities with their passwords resolved from the environment.
#[derive(Clone)]
pub struct SeedUsers {
    pub admin_email: String,
    pub admin_password: String,
    pub user_email: String,
    pub user_password: String,
}

impl fmt::Debug for SeedUsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUsers")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"<redacted>")
            .field("user_email", &self.user_email)
            .field("user_password", &"<redacted>")
            .finish()
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl SafeVaultConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SafeVaultConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required values and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.issuer.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "jwt.issuer must not be empty".to_string(),
            ));
        }
        if self.jwt.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "jwt.audience must not be empty".to_string(),
            ));
        }
        validate_env_var(&self.jwt.key_env)?;

        if let Some(ref seed) = self.seed {
            validate_env_var(&seed.admin_password_env)?;
            validate_env_var(&seed.user_password_env)?;
        }

        Ok(())
    }

    /// Resolve the seed identities, if a `[seed]` section is present
    pub fn seed_users(&self) -> Result<Option<SeedUsers>, ConfigError> {
        let Some(ref seed) = self.seed else {
            return Ok(None);
        };

        let password = |env: &str| {
            resolve_env(env).ok_or_else(|| ConfigError::MissingEnvVar(env.to_string()))
        };

        Ok(Some(SeedUsers {
            admin_email: seed.admin_email.clone(),
            admin_password: password(&seed.admin_password_env)?,
            user_email: seed.user_email.clone(),
            user_password: password(&seed.user_password_env)?,
        }))
    }
}

fn validate_env_var(name: &str) -> Result<(), ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
    Ok(())
}

/// Get a resolved value from an env var reference
pub fn resolve_env(env_name: &str) -> Option<String> {
    std::env::var(env_name).ok()
}
