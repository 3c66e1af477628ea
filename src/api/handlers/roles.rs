use crate::{
    AppState,
    auth::roles::assign_role as assign,
    types::{AppError, AssignRoleRequest, Result},
};
use axum::{Json, extract::State, http::StatusCode};

/// Assign a role to a user, creating the role if needed
#[utoipa::path(
    post,
    path = "/api/roles/assign",
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned"),
        (status = 400, description = "User not found or rejected by the identity store"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "roles",
    security(("bearer" = []))
)]
pub async fn assign_role(
    State(state): State<AppState>,
    Json(payload): Json<AssignRoleRequest>,
) -> Result<StatusCode> {
    let identity = state
        .identities
        .find_by_name(&payload.username)
        .await?
        .ok_or_else(|| AppError::InvalidInput("User not found.".to_string()))?;

    assign(state.identities.as_ref(), &identity, &payload.role).await?;
    Ok(StatusCode::OK)
}
