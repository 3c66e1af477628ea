//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use safevault::{
    AppState, SigningKeyProvider,
    api::routes::create_router,
    db::{Identity, IdentityStore, InMemoryIdentityStore, InMemoryUserRepository, UserRepository},
    seed::seed_identities,
    utils::toml_config::{JwtConfig, SeedUsers},
};
use std::sync::Arc;

pub const TEST_KEY: &str = "dGVzdC1zaWduaW5nLWtleS0zMi1ieXRlcy1sb25nISE=";
pub const ISSUER: &str = "safevault-test";
pub const AUDIENCE: &str = "safevault-test-clients";

pub const ADMIN_PASSWORD: &str = "Admin123";
pub const USER_PASSWORD: &str = "User1234";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(ISSUER, AUDIENCE)
}

pub fn signing_keys() -> Arc<SigningKeyProvider> {
    Arc::new(SigningKeyProvider::from_base64(Some(TEST_KEY)).expect("test key should decode"))
}

pub fn build_state(
    identities: Arc<dyn IdentityStore>,
    users: Arc<dyn UserRepository>,
) -> AppState {
    AppState::new(&jwt_config(), signing_keys(), identities, users).expect("state should build")
}

pub fn seed_users() -> SeedUsers {
    SeedUsers {
        admin_email: "admin@safevault.test".to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        user_email: "user@safevault.test".to_string(),
        user_password: USER_PASSWORD.to_string(),
    }
}

/// In-memory stores seeded with `admin` and `user`.
pub async fn seeded_state() -> AppState {
    let identities = Arc::new(InMemoryIdentityStore::new());
    seed_identities(identities.as_ref(), &seed_users())
        .await
        .expect("seeding should succeed");

    build_state(identities, Arc::new(InMemoryUserRepository::new()))
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// Issues a token directly, bypassing login.
pub fn token_for(state: &AppState, identity: &Identity, roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    state
        .token_issuer
        .issue_token(identity, &roles)
        .expect("token should issue")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
