use crate::config::JwtConfig;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Generates a signed access token for `username`.
///
/// The token expires `jwt.expire_minutes` after issuance and is signed with
/// `jwt.secret` using `jwt.algorithm`.
///
/// # Returns
/// The encoded JWT, or `AppError::InternalServerError` if encoding fails.
pub fn generate_token(username: &str, jwt: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = chrono::Duration::try_minutes(jwt.expire_minutes)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Token lifetime of {} minutes is out of range",
                jwt.expire_minutes
            ))
        })?;

    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::new(jwt.algorithm),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// The signature, the algorithm and the expiration are checked; an expired token
/// is rejected as soon as `exp` has passed.
///
/// # Returns
/// The decoded `Claims`, or `AppError::Unauthorized` if the token is malformed,
/// its signature is invalid, or it has expired.
pub fn verify_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(jwt.algorithm);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}
