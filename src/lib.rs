//! # SafeVault - Credential Issuance & Input-Safety Server
//!
//! A user-management server built around a small security core:
//!
//! - **Input safety**: allow-list validation of usernames and emails
//! - **Tokens**: HS256 bearer tokens carrying identity and role claims
//! - **Authorization**: role requirements evaluated against validated claims
//! - **Key material**: on-demand HMAC, AES and RSA key generation
//!
//! ## Overview
//!
//! SafeVault can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `safevault-server` binary
//! 2. **As a library** - Build the router around your own identity store
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use safevault::{AppState, SafeVaultConfig, api::routes::create_router};
//! use safevault::auth::keys::SigningKeyProvider;
//! use safevault::db::{InMemoryIdentityStore, InMemoryUserRepository};
//! use std::sync::Arc;
//!
//! let config = SafeVaultConfig::load("safevault.toml")?;
//! let keys = Arc::new(SigningKeyProvider::from_config(&config.jwt)?);
//! let state = AppState::new(
//!     &config.jwt,
//!     keys,
//!     Arc::new(InMemoryIdentityStore::new()),
//!     Arc::new(InMemoryUserRepository::new()),
//! )?;
//! let app = create_router(state);
//! ```
//!
//! ## Input Validation
//!
//! ```rust
//! use safevault::validation::{is_safe_email, is_safe_username};
//!
//! assert!(is_safe_username("john_doe"));
//! assert!(!is_safe_username("' OR 1=1 --"));
//! assert!(is_safe_email("john@example.com"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Serve interactive API docs at `/swagger-ui/` |

/// HTTP API handlers and routes.
pub mod api;
/// Token issuance, validation and authorization.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Identity store and user directory.
pub mod db;
/// Key material generation.
pub mod keygen;
/// Startup identity seeding.
pub mod seed;
/// Request/response types and errors.
pub mod types;
/// Configuration and telemetry.
pub mod utils;
/// Input safety predicates.
pub mod validation;

// Re-export commonly used types
pub use auth::jwt::{Claims, TokenIssuer};
pub use auth::keys::SigningKeyProvider;
pub use auth::policy::TokenValidationPolicy;
pub use db::{IdentityStore, UserRepository};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, SafeVaultConfig};

use std::sync::Arc;
use utils::toml_config::JwtConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub token_issuer: Arc<TokenIssuer>,
    pub token_policy: Arc<TokenValidationPolicy>,
    pub identities: Arc<dyn IdentityStore>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Builds the issuer and validation policy over one shared signing key.
    pub fn new(
        jwt: &JwtConfig,
        keys: Arc<SigningKeyProvider>,
        identities: Arc<dyn IdentityStore>,
        users: Arc<dyn UserRepository>,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            token_issuer: Arc::new(TokenIssuer::new(jwt, keys.clone())?),
            token_policy: Arc::new(TokenValidationPolicy::new(jwt, keys)),
            identities,
            users,
        })
    }
}
