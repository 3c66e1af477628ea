//! Token Issuance, Validation and Authorization
//!
//! This module provides the credential side of SafeVault: the signing key,
//! token issuance, the acceptance policy applied to bearer tokens, and role
//! checks for protected routes.
//!
//! # Module Structure
//!
//! - [`auth::keys`](crate::auth::keys) - Process-wide HMAC signing key
//! - [`auth::jwt`](crate::auth::jwt) - Claims and the token issuer
//! - [`auth::policy`](crate::auth::policy) - Bearer-token acceptance rules
//! - [`auth::authorize`](crate::auth::authorize) - Role requirements and the role layer
//! - [`auth::roles`](crate::auth::roles) - Role assignment, removal and identity deletion
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for authentication
//!
//! # Security Features
//!
//! - **JWT Tokens**: HS256 signed tokens with a configurable lifetime
//! - **Strict lifetime**: a token whose `exp` equals the current second is rejected
//! - **Uniform failures**: every rejected token is a plain 401
//!
//! # Usage
//!
//! ## Token Issuance
//!
//! ```ignore
//! use safevault::auth::{jwt::TokenIssuer, keys::SigningKeyProvider};
//!
//! let keys = Arc::new(SigningKeyProvider::from_config(&config.jwt)?);
//! let issuer = TokenIssuer::new(&config.jwt, keys.clone())?;
//! let token = issuer.issue_token(&identity, &roles)?;
//! ```
//!
//! ## Protecting Routes
//!
//! `auth_middleware` validates the token and injects `Claims` into the request
//! extensions; `require_role` then checks the required role:
//!
//! ```ignore
//! let admin = Router::new()
//!     .route("/api/admin/dashboard", get(dashboard))
//!     .route_layer(middleware::from_fn_with_state(RoleRequirement::admin(), require_role))
//!     .route_layer(middleware::from_fn_with_state(policy, auth_middleware));
//! ```
//!
//! ## Extracting Claims in Handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.unique_name)
//! }
//! ```

/// Role requirements and the role-check middleware.
pub mod authorize;
/// Claims and token issuance.
pub mod jwt;
/// Signing key provider.
pub mod keys;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Bearer-token validation policy.
pub mod policy;
/// Role assignment and identity deletion.
pub mod roles;
