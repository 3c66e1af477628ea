//! On-demand key material generation.
//!
//! Generates HMAC keys, AES keys with an IV, and RSA key pairs. Material is
//! returned once and never retained or logged. These are provisioning
//! utilities; the server's own signing key never passes through here.
//!
//! Responses carry private material, so callers must only expose them over
//! TLS and behind an admin check.

use crate::types::{AppError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use openssl::{pkey::PKey, rsa::Rsa};
use rand::{TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_HMAC_BITS: i64 = 256;
pub const DEFAULT_AES_BITS: i64 = 256;
pub const DEFAULT_RSA_BITS: i64 = 2048;

const MAX_HMAC_BITS: i64 = 4096;
const AES_KEY_SIZES: [i64; 3] = [128, 192, 256];
const RSA_KEY_SIZES: [i64; 3] = [2048, 3072, 4096];
const AES_BLOCK_BYTES: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HmacKeyMaterial {
    pub algorithm: String,
    pub key_base64: String,
    pub key_size_bits: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AesKeyMaterial {
    pub algorithm: String,
    pub key_base64: String,
    pub iv_base64: String,
    pub key_size_bits: i64,
}

/// RSA key pair.
///
/// Despite the field names, both keys are raw base64 of their DER encoding
/// (PKCS#8 and SubjectPublicKeyInfo) without PEM armor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RsaKeyPair {
    pub key_size_bits: i64,
    pub private_key_pem: String,
    pub public_key_pem: String,
}

fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("OS random source failed: {}", e)))?;
    Ok(bytes)
}

/// Random HMAC-SHA-256 key of `bits` bits.
///
/// `bits` must be a positive multiple of 8, at most 4096.
pub fn generate_hmac_key(bits: i64) -> Result<HmacKeyMaterial> {
    if bits <= 0 || bits % 8 != 0 || bits > MAX_HMAC_BITS {
        return Err(AppError::InvalidInput(format!(
            "HMAC key size must be a positive multiple of 8 up to {} bits, got {}",
            MAX_HMAC_BITS, bits
        )));
    }

    let key = random_bytes((bits / 8) as usize)?;

    Ok(HmacKeyMaterial {
        algorithm: "HS256".to_string(),
        key_base64: STANDARD.encode(key),
        key_size_bits: bits,
    })
}

/// Random AES key of 128, 192 or 256 bits plus a fresh 16-byte IV.
pub fn generate_aes_key(bits: i64) -> Result<AesKeyMaterial> {
    if !AES_KEY_SIZES.contains(&bits) {
        return Err(AppError::InvalidInput(format!(
            "AES key size must be 128, 192 or 256 bits, got {}",
            bits
        )));
    }

    let key = random_bytes((bits / 8) as usize)?;
    let iv = random_bytes(AES_BLOCK_BYTES)?;

    Ok(AesKeyMaterial {
        algorithm: format!("AES-{}", bits),
        key_base64: STANDARD.encode(key),
        iv_base64: STANDARD.encode(iv),
        key_size_bits: bits,
    })
}

/// Maps a requested RSA size onto 2048, 3072 or 4096.
///
/// Anything other than those three sizes, including smaller ones, becomes
/// 2048 rather than an error.
pub fn clamp_rsa_key_size(requested: i64) -> i64 {
    if RSA_KEY_SIZES.contains(&requested) {
        requested
    } else {
        DEFAULT_RSA_BITS
    }
}

/// RSA key pair of the clamped size. CPU heavy; run off the async executor.
pub fn generate_rsa_key_pair(requested_bits: i64) -> Result<RsaKeyPair> {
    let bits = clamp_rsa_key_size(requested_bits);

    let rsa = Rsa::generate(bits as u32)
        .map_err(|e| AppError::Internal(format!("RSA key generation failed: {}", e)))?;
    let pkey = PKey::from_rsa(rsa)
        .map_err(|e| AppError::Internal(format!("RSA key wrapping failed: {}", e)))?;

    let private_der = pkey
        .private_key_to_pkcs8()
        .map_err(|e| AppError::Internal(format!("PKCS#8 export failed: {}", e)))?;
    let public_der = pkey
        .public_key_to_der()
        .map_err(|e| AppError::Internal(format!("SubjectPublicKeyInfo export failed: {}", e)))?;

    Ok(RsaKeyPair {
        key_size_bits: bits,
        private_key_pem: STANDARD.encode(private_der),
        public_key_pem: STANDARD.encode(public_der),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_default_size() {
        let material = generate_hmac_key(DEFAULT_HMAC_BITS).expect("should generate");
        assert_eq!(material.algorithm, "HS256");
        assert_eq!(material.key_size_bits, 256);

        let key = STANDARD.decode(&material.key_base64).expect("base64");
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_hmac_keys_are_fresh() {
        let a = generate_hmac_key(256).expect("should generate");
        let b = generate_hmac_key(256).expect("should generate");
        assert_ne!(a.key_base64, b.key_base64);
    }

    #[test]
    fn test_hmac_custom_and_invalid_sizes() {
        let material = generate_hmac_key(512).expect("should generate");
        assert_eq!(STANDARD.decode(&material.key_base64).expect("base64").len(), 64);

        for bits in [0, -8, 7, 100, 4104] {
            assert!(
                matches!(generate_hmac_key(bits), Err(AppError::InvalidInput(_))),
                "{bits} should be rejected"
            );
        }
    }

    #[test]
    fn test_aes_sizes() {
        for bits in [128, 192, 256] {
            let material = generate_aes_key(bits).expect("should generate");
            assert_eq!(material.algorithm, format!("AES-{}", bits));
            assert_eq!(material.key_size_bits, bits);
            assert_eq!(
                STANDARD.decode(&material.key_base64).expect("base64").len(),
                (bits / 8) as usize
            );
            assert_eq!(STANDARD.decode(&material.iv_base64).expect("base64").len(), 16);
        }
    }

    #[test]
    fn test_aes_invalid_size() {
        for bits in [0, 64, 255, 512] {
            assert!(matches!(generate_aes_key(bits), Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_clamp_rsa_key_size() {
        assert_eq!(clamp_rsa_key_size(2048), 2048);
        assert_eq!(clamp_rsa_key_size(3072), 3072);
        assert_eq!(clamp_rsa_key_size(4096), 4096);
        for requested in [1024, 0, -1, 2047, 2049, 3000, 8192, i64::MAX] {
            assert_eq!(clamp_rsa_key_size(requested), 2048, "{requested} should clamp");
        }
    }

    #[test]
    fn test_rsa_1024_request_yields_2048_pair() {
        let pair = generate_rsa_key_pair(1024).expect("should generate");
        assert_eq!(pair.key_size_bits, 2048);

        // Raw DER, not PEM armor
        assert!(!pair.private_key_pem.contains("-----BEGIN"));
        assert!(!pair.public_key_pem.contains("-----BEGIN"));

        let private = PKey::private_key_from_pkcs8(
            &STANDARD.decode(&pair.private_key_pem).expect("base64"),
        )
        .expect("private key should be PKCS#8 DER");
        assert_eq!(private.bits(), 2048);

        let public = PKey::public_key_from_der(
            &STANDARD.decode(&pair.public_key_pem).expect("base64"),
        )
        .expect("public key should be SubjectPublicKeyInfo DER");
        assert_eq!(public.bits(), 2048);
        assert!(public.public_eq(&private));
    }

    #[test]
    fn test_material_serializes_camel_case() {
        let material = generate_aes_key(128).expect("should generate");
        let json = serde_json::to_value(&material).expect("json");
        assert!(json.get("keyBase64").is_some());
        assert!(json.get("ivBase64").is_some());
        assert_eq!(json["keySizeBits"], 128);
        assert_eq!(json["algorithm"], "AES-128");
    }
}
