use crate::{
    AppState,
    auth::roles::{assign_role as assign, delete_identity, find_identity, remove_role as remove},
    types::{IdentityResponse, Result, SystemInfoResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// Admin welcome message
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Welcome message", body = String),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn dashboard() -> &'static str {
    "Welcome Admin!"
}

/// List all registered identities
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = Vec<IdentityResponse>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<IdentityResponse>>> {
    let users = state.identities.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get the roles held by a user
#[utoipa::path(
    get,
    path = "/api/admin/users/{username}/roles",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Role names", body = Vec<String>),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn get_user_roles(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>> {
    let identity = find_identity(state.identities.as_ref(), &username).await?;
    Ok(Json(state.identities.get_roles(&identity).await?))
}

/// Assign a role to a user, creating the role if needed
#[utoipa::path(
    post,
    path = "/api/admin/users/{username}/roles/{role}",
    params(
        ("username" = String, Path, description = "Username"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role assigned"),
        (status = 400, description = "Rejected by the identity store"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn assign_role(
    State(state): State<AppState>,
    Path((username, role)): Path<(String, String)>,
) -> Result<StatusCode> {
    let identity = find_identity(state.identities.as_ref(), &username).await?;
    assign(state.identities.as_ref(), &identity, &role).await?;
    Ok(StatusCode::OK)
}

/// Remove a role from a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{username}/roles/{role}",
    params(
        ("username" = String, Path, description = "Username"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role removed, or was not held"),
        (status = 400, description = "Rejected by the identity store"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn remove_role(
    State(state): State<AppState>,
    Path((username, role)): Path<(String, String)>,
) -> Result<StatusCode> {
    let identity = find_identity(state.identities.as_ref(), &username).await?;
    remove(state.identities.as_ref(), &identity, &role).await?;
    Ok(StatusCode::OK)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Rejected by the identity store"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode> {
    let identity = find_identity(state.identities.as_ref(), &username).await?;
    delete_identity(state.identities.as_ref(), &identity).await?;
    Ok(StatusCode::OK)
}

/// Basic host information
#[utoipa::path(
    get,
    path = "/api/admin/system-info",
    responses((status = 200, description = "System information", body = SystemInfoResponse)),
    tag = "admin",
    security(("bearer" = []))
)]
pub async fn system_info() -> Json<SystemInfoResponse> {
    let machine_name = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    Json(SystemInfoResponse {
        machine_name,
        os_version: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        timestamp: chrono::Utc::now(),
    })
}
