use crate::{
    AppState,
    auth::middleware::AuthUser,
    db::NewIdentity,
    types::{
        AppError, CurrentUserResponse, IdentityResponse, LoginRequest, RegisterRequest, Result,
        TokenResponse,
    },
    validation::{is_safe_email, is_safe_username},
};
use axum::{Json, extract::State};
use tracing::info;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = IdentityResponse),
        (status = 400, description = "Invalid input or rejected by the identity store")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<IdentityResponse>> {
    if !is_safe_username(&payload.username) {
        return Err(AppError::InvalidInput(
            "Invalid username. Only letters, numbers, underscore, dot, hyphen allowed.".to_string(),
        ));
    }
    if !is_safe_email(&payload.email) {
        return Err(AppError::InvalidInput("Invalid or unsafe email format.".to_string()));
    }

    let identity = state
        .identities
        .create_user(
            NewIdentity::new(payload.username, payload.email),
            &payload.password,
        )
        .await?;

    info!(user_id = %identity.id, "user registered");
    Ok(Json(identity.into()))
}

/// Login with username (or email) and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let identity = match state.identities.find_by_name(&payload.username).await? {
        Some(identity) => identity,
        None => state
            .identities
            .find_by_email(&payload.username)
            .await?
            .ok_or(AppError::Unauthenticated)?,
    };

    if !state
        .identities
        .check_password(&identity, &payload.password)
        .await?
    {
        return Err(AppError::Unauthenticated);
    }

    let roles = state.identities.get_roles(&identity).await?;
    let token = state.token_issuer.issue_token(&identity, &roles)?;

    Ok(Json(TokenResponse {
        token,
        expires_in: state.token_issuer.expires_in(),
    }))
}

/// Get the authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn me(AuthUser(claims): AuthUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        id: claims.sub,
        username: claims.unique_name,
        email: claims.email,
        roles: claims.roles,
        expires_at: claims.exp,
    })
}
