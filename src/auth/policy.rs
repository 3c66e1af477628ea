//! Bearer-token acceptance rules.
//!
//! A token is accepted only when every rule holds:
//! - the HS256 signature verifies against the current signing key
//! - `iss` equals the configured issuer
//! - `aud` equals the configured audience
//! - `exp` is strictly in the future
//!
//! Every failure maps to [`AppError::Unauthenticated`]. Which rule failed is
//! only visible in `debug` logs.

use crate::auth::jwt::Claims;
use crate::auth::keys::SigningKeyProvider;
use crate::types::{AppError, Result};
use crate::utils::toml_config::JwtConfig;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Validation, decode};
use std::sync::Arc;
use tracing::debug;

pub struct TokenValidationPolicy {
    validation: Validation,
    keys: Arc<SigningKeyProvider>,
}

impl TokenValidationPolicy {
    pub fn new(config: &JwtConfig, keys: Arc<SigningKeyProvider>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Lifetime is checked below with a strict comparison and no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self { validation, keys }
    }

    /// Validates `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validates `token` as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let claims = decode::<Claims>(token, self.keys.key().decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = %e, "bearer token rejected");
                AppError::Unauthenticated
            })?;

        if claims.exp <= now.timestamp() {
            debug!(sub = %claims.sub, "bearer token rejected: expired");
            return Err(AppError::Unauthenticated);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenIssuer;
    use crate::db::Identity;
    use base64::{
        Engine as _,
        engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    };
    use jsonwebtoken::{EncodingKey, Header, encode};

    const KEY: &str = "dGVzdC1zaWduaW5nLWtleS0zMi1ieXRlcy1sb25nISE=";

    fn keys(encoded: &str) -> Arc<SigningKeyProvider> {
        Arc::new(SigningKeyProvider::from_base64(Some(encoded)).expect("should decode key"))
    }

    fn config() -> JwtConfig {
        JwtConfig::new("safevault-test", "safevault-test-clients")
    }

    fn identity() -> Identity {
        Identity {
            id: "user-42".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
        }
    }

    fn issue(config: &JwtConfig, key: &str) -> String {
        TokenIssuer::new(config, keys(key))
            .expect("issuer")
            .issue_token(&identity(), &["admin".to_string()])
            .expect("should issue")
    }

    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').expect("signature segment");
        let mut chars: Vec<char> = signature.chars().collect();
        let mid = chars.len() / 2;
        chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_round_trip() {
        let token = issue(&config(), KEY);
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));

        let claims = policy.validate(&token).expect("token should validate");
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.unique_name, "jane");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = issue(&config(), KEY);
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));

        let result = policy.validate(&tamper_signature(&token));
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue(&config(), KEY);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&parts[1]).expect("base64url"))
                .expect("json");
        payload["role"] = serde_json::json!(["admin", "superuser"]);
        parts[1] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).expect("json"));

        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        assert!(matches!(
            policy.validate(&parts.join(".")),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = issue(&config(), KEY);
        let policy = TokenValidationPolicy::new(&config(), keys("b3RoZXIta2V5"));
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = issue(&JwtConfig::new("someone-else", "safevault-test-clients"), KEY);
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = issue(&JwtConfig::new("safevault-test", "other-clients"), KEY);
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_expiry_is_strict() {
        let issuer = TokenIssuer::new(&config(), keys(KEY)).expect("issuer");
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let token = issuer
            .issue_token_at(&identity(), &[], issued_at)
            .expect("should issue");

        let exp = DateTime::from_timestamp(1_700_000_000 + 3600, 0).expect("timestamp");
        let just_before = DateTime::from_timestamp(1_700_000_000 + 3599, 0).expect("timestamp");

        assert!(policy.validate_at(&token, just_before).is_ok());
        assert!(matches!(
            policy.validate_at(&token, exp),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_zero_expiry_token_rejected() {
        let mut short = config();
        short.expiry_minutes = 0;
        let token = issue(&short, KEY);

        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let provider = keys(KEY);
        let claims = Claims {
            sub: "user-42".to_string(),
            unique_name: "jane".to_string(),
            email: "jane@example.com".to_string(),
            roles: vec!["admin".to_string()],
            iss: "safevault-test".to_string(),
            aud: "safevault-test-clients".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 600,
        };
        let secret = STANDARD.decode(KEY).expect("key bytes");
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .expect("should encode");

        let policy = TokenValidationPolicy::new(&config(), provider);
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "sub": "user-42",
                "role": ["admin"],
                "iss": "safevault-test",
                "aud": "safevault-test-clients",
                "iat": 0,
                "exp": i64::MAX / 2,
            })
            .to_string(),
        );
        let token = format!("{}.{}.", header, payload);

        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        assert!(matches!(policy.validate(&token), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let policy = TokenValidationPolicy::new(&config(), keys(KEY));
        for token in ["", "invalid.token.here", "a.b", "not-a-jwt"] {
            assert!(
                matches!(policy.validate(token), Err(AppError::Unauthenticated)),
                "{token:?} should be rejected"
            );
        }
    }
}
