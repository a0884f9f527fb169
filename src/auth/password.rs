use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Salts and hashes a plaintext password for the `users.hashed_password` column.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Checks `password` against a stored hash. A malformed stored hash is a server
/// error, not a failed login.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}
