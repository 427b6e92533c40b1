use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a password with bcrypt. The salt and cost factor are embedded in
/// the output string, so verification needs no side channel.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verifies a plaintext password against a stored bcrypt hash.
///
/// Any malformed hash yields `false` rather than an error; nothing past
/// this boundary learns why verification failed.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or(false)
}
