use crate::{
    AppState,
    types::{AppError, CreateUserRequest, Result, UserResponse},
    validation::{is_safe_email, is_safe_username},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

const BASE_ROUTE: &str = "/api/users";

fn unsafe_username() -> AppError {
    AppError::InvalidInput(
        "Invalid username. Only letters, numbers, underscore, dot, hyphen allowed.".to_string(),
    )
}

/// Get a user from the directory
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Unsafe username"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    if !is_safe_username(&username) {
        return Err(unsafe_username());
    }

    state
        .users
        .get_user(&username)
        .await?
        .map(|record| Json(record.into()))
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
}

/// Add a user to the directory
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Unsafe username or email")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    if !is_safe_username(&payload.username) {
        return Err(unsafe_username());
    }
    if !is_safe_email(&payload.email) {
        return Err(AppError::InvalidInput("Invalid or unsafe email format.".to_string()));
    }

    state
        .users
        .save_user(&payload.username, &payload.email)
        .await?;

    let created: UserResponse = state
        .users
        .get_user(&payload.username)
        .await?
        .ok_or_else(|| AppError::Internal("saved user could not be read back".to_string()))?
        .into();

    let location = format!("{}/{}", BASE_ROUTE, created.username);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}
