//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for SafeVault, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register new user
//! - `POST /api/auth/login` - Login and receive JWT token
//! - `GET /api/auth/me` - Claims of the authenticated caller
//!
//! ## Users (`/api/users`)
//! - `POST /api/users` - Add a user to the directory
//! - `GET /api/users/{username}` - Get a user from the directory
//!
//! ## Administration (`/api/admin`, admin role required)
//! - `GET /api/admin/dashboard` - Welcome message
//! - `GET /api/admin/users` - List users
//! - `GET /api/admin/users/{username}/roles` - Roles held by a user
//! - `POST /api/admin/users/{username}/roles/{role}` - Assign a role
//! - `DELETE /api/admin/users/{username}/roles/{role}` - Remove a role
//! - `DELETE /api/admin/users/{username}` - Delete a user
//! - `GET /api/admin/system-info` - Host information
//! - `POST /api/roles/assign` - Assign a role by request body
//!
//! ## Keys (`/api/keys`, admin role required)
//! - `POST /api/keys/jwt` - HMAC key
//! - `POST /api/keys/aes` - AES key and IV
//! - `POST /api/keys/rsa` - RSA key pair
//!
//! # Authentication
//!
//! Protected endpoints require a valid JWT token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive API documentation is available
//! at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::system::root,
        handlers::system::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::admin::dashboard,
        handlers::admin::list_users,
        handlers::admin::get_user_roles,
        handlers::admin::assign_role,
        handlers::admin::remove_role,
        handlers::admin::delete_user,
        handlers::admin::system_info,
        handlers::roles::assign_role,
        handlers::keys::generate_jwt_key,
        handlers::keys::generate_aes_key,
        handlers::keys::generate_rsa_key,
    ),
    components(schemas(
        crate::types::RegisterRequest,
        crate::types::LoginRequest,
        crate::types::TokenResponse,
        crate::types::CurrentUserResponse,
        crate::types::CreateUserRequest,
        crate::types::UserResponse,
        crate::types::IdentityResponse,
        crate::types::AssignRoleRequest,
        crate::types::SystemInfoResponse,
        crate::types::KeySizeRequest,
        crate::keygen::HmacKeyMaterial,
        crate::keygen::AesKeyMaterial,
        crate::keygen::RsaKeyPair,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and current user"),
        (name = "users", description = "User directory"),
        (name = "admin", description = "Administration (admin role)"),
        (name = "roles", description = "Role assignment (admin role)"),
        (name = "keys", description = "Key material generation (admin role)"),
        (name = "system", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
