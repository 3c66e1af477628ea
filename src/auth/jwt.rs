use crate::auth::keys::SigningKeyProvider;
use crate::db::Identity;
use crate::types::{AppError, Result};
use crate::utils::toml_config::{ConfigError, JwtConfig};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, Header, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Claim set carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id
    pub sub: String,
    /// Username
    #[serde(default)]
    pub unique_name: String,
    #[serde(default)]
    pub email: String,
    /// One entry per role, in the order the roles were supplied
    #[serde(rename = "role", default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Case-sensitive role membership check.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Builds and signs HS256 bearer tokens.
///
/// Construction checks the issuer and audience; after that, issuing only
/// depends on its arguments and the clock.
#[derive(Debug)]
pub struct TokenIssuer {
    issuer: String,
    audience: String,
    lifetime: TimeDelta,
    keys: Arc<SigningKeyProvider>,
}

impl TokenIssuer {
    /// Creates an issuer from the token settings and the shared signing key.
    ///
    /// A zero or negative `expiry_minutes` is accepted and produces tokens that
    /// are already expired when issued.
    pub fn new(config: &JwtConfig, keys: Arc<SigningKeyProvider>) -> std::result::Result<Self, ConfigError> {
        if config.issuer.trim().is_empty() {
            return Err(ConfigError::ValidationError("token issuer is not set".to_string()));
        }
        if config.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError("token audience is not set".to_string()));
        }

        let lifetime = TimeDelta::try_minutes(config.expiry_minutes).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "expiry_minutes out of range: {}",
                config.expiry_minutes
            ))
        })?;

        Ok(Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime,
            keys,
        })
    }

    /// Issues a token for `identity` carrying `roles`.
    pub fn issue_token(&self, identity: &Identity, roles: &[String]) -> Result<String> {
        self.issue_token_at(identity, roles, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_token_at(
        &self,
        identity: &Identity,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> Result<String> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::Internal("token expiry overflows the clock".to_string()))?;

        let claims = Claims {
            sub: identity.id.clone(),
            unique_name: identity.username.clone(),
            email: identity.email.clone(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.keys.key().encoding_key(),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        debug!(sub = %claims.sub, "token issued");
        Ok(token)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}
