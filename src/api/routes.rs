use crate::AppState;
use crate::api::{ApiDoc, handlers};
use crate::auth::{
    authorize::{RoleRequirement, require_role},
    middleware::auth_middleware,
};
use axum::{
    Json, Router, middleware,
    routing::{delete, get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;

/// Credential payloads are small; larger request bodies are refused with 413.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
///
/// Admin routes run `auth_middleware` first and then `require_role`; a missing
/// or rejected token is a 401, a valid token without the role is a 403.
pub fn create_router(state: AppState) -> Router {
    let authenticate = middleware::from_fn_with_state(state.token_policy.clone(), auth_middleware);

    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users/{username}", get(handlers::users::get_user))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route_layer(authenticate.clone());

    let admin_routes = Router::new()
        .route("/api/admin/dashboard", get(handlers::admin::dashboard))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/{username}",
            delete(handlers::admin::delete_user),
        )
        .route(
            "/api/admin/users/{username}/roles",
            get(handlers::admin::get_user_roles),
        )
        .route(
            "/api/admin/users/{username}/roles/{role}",
            post(handlers::admin::assign_role).delete(handlers::admin::remove_role),
        )
        .route("/api/admin/system-info", get(handlers::admin::system_info))
        .route("/api/roles/assign", post(handlers::roles::assign_role))
        // Key material
        .route("/api/keys/jwt", post(handlers::keys::generate_jwt_key))
        .route("/api/keys/aes", post(handlers::keys::generate_aes_key))
        .route("/api/keys/rsa", post(handlers::keys::generate_rsa_key))
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::admin(),
            require_role,
        ))
        .route_layer(authenticate);

    let router = public_routes.merge(authenticated_routes).merge(admin_routes);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/swagger-ui/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
