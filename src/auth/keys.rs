//! Process-wide token signing key.
//!
//! The key is decoded once from its base64 configuration value and never
//! changes afterwards. Issuer and validation policy share one
//! [`SigningKeyProvider`] through an `Arc`.

use crate::utils::toml_config::{ConfigError, JwtConfig};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fmt;

/// Symmetric HMAC key with its precomputed `jsonwebtoken` forms.
pub struct SigningKey {
    len: usize,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            len: bytes.len(),
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len)
            .field("material", &"<redacted>")
            .finish()
    }
}

/// Holds the single signing key for the lifetime of the process.
#[derive(Debug)]
pub struct SigningKeyProvider {
    key: SigningKey,
}

impl SigningKeyProvider {
    /// Decode the key from its base64 configuration value.
    ///
    /// Fails when the value is absent, is not valid base64, or decodes to
    /// zero bytes.
    pub fn from_base64(value: Option<&str>) -> Result<Self, ConfigError> {
        let encoded = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::InvalidSigningKey("signing key is not set".to_string()))?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ConfigError::InvalidSigningKey(format!("signing key is not valid base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(ConfigError::InvalidSigningKey(
                "signing key decodes to zero bytes".to_string(),
            ));
        }

        Ok(Self {
            key: SigningKey::from_bytes(&bytes),
        })
    }

    /// Read the key from the environment variable named by `jwt.key_env`.
    pub fn from_config(config: &JwtConfig) -> Result<Self, ConfigError> {
        let encoded = config.signing_key()?;
        Self::from_base64(Some(&encoded))
    }

    /// The signing key. Always the same instance.
    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}
