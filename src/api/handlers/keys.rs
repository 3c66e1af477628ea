use crate::{
    keygen::{
        self, AesKeyMaterial, DEFAULT_AES_BITS, DEFAULT_HMAC_BITS, DEFAULT_RSA_BITS,
        HmacKeyMaterial, RsaKeyPair,
    },
    types::{AppError, KeySizeRequest, Result},
};
use axum::Json;

/// Generate an HMAC signing key
#[utoipa::path(
    post,
    path = "/api/keys/jwt",
    request_body = KeySizeRequest,
    responses(
        (status = 200, description = "Generated key", body = HmacKeyMaterial),
        (status = 400, description = "Unsupported key size")
    ),
    tag = "keys",
    security(("bearer" = []))
)]
pub async fn generate_jwt_key(
    Json(payload): Json<KeySizeRequest>,
) -> Result<Json<HmacKeyMaterial>> {
    let bits = payload.key_size_bits.unwrap_or(DEFAULT_HMAC_BITS);
    Ok(Json(keygen::generate_hmac_key(bits)?))
}

/// Generate an AES key and IV
#[utoipa::path(
    post,
    path = "/api/keys/aes",
    request_body = KeySizeRequest,
    responses(
        (status = 200, description = "Generated key and IV", body = AesKeyMaterial),
        (status = 400, description = "Unsupported key size")
    ),
    tag = "keys",
    security(("bearer" = []))
)]
pub async fn generate_aes_key(
    Json(payload): Json<KeySizeRequest>,
) -> Result<Json<AesKeyMaterial>> {
    let bits = payload.key_size_bits.unwrap_or(DEFAULT_AES_BITS);
    Ok(Json(keygen::generate_aes_key(bits)?))
}

/// Generate an RSA key pair (size clamped to 2048, 3072 or 4096)
#[utoipa::path(
    post,
    path = "/api/keys/rsa",
    request_body = KeySizeRequest,
    responses((status = 200, description = "Generated key pair", body = RsaKeyPair)),
    tag = "keys",
    security(("bearer" = []))
)]
pub async fn generate_rsa_key(Json(payload): Json<KeySizeRequest>) -> Result<Json<RsaKeyPair>> {
    let bits = payload.key_size_bits.unwrap_or(DEFAULT_RSA_BITS);

    let pair = tokio::task::spawn_blocking(move || keygen::generate_rsa_key_pair(bits))
        .await
        .map_err(|e| AppError::Internal(format!("RSA generation task failed: {}", e)))??;

    Ok(Json(pair))
}
