pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::IdentityService;
pub use token::{decode_token, issue_token, Claims, TokenResponse};

/// Represents the payload for a new user registration request.
///
/// The password policy is enforced here, at the boundary, before the
/// identity service is invoked; the service still re-checks that the two
/// passwords match.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username for the new account. Must be a valid email address.
    #[validate(email)]
    pub username: String,
    /// Password for the new account.
    #[validate(custom = "validate_password_strength")]
    pub password1: String,
    /// Password confirmation.
    #[validate(custom = "validate_password_strength")]
    pub password2: String,
}

/// Response structure after successful registration.
/// The password (and its hash) are never echoed back.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub username: String,
}

/// Represents the payload for a user login request (form-encoded).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Validates a password against the registration policy:
/// minimum length 8, at least one letter, one digit, one special
/// character, one uppercase and one lowercase letter. All violations are
/// aggregated into a single message joined by ", ".
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let mut reasons = Vec::new();

    if password.len() < 8 {
        reasons.push("Password should have at least 8 characters.");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        reasons.push("Password should contain at least one alphabet letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        reasons.push("Password should contain at least one digit.");
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        reasons.push("Password should contain at least one special character.");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        reasons.push("Password should contain at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        reasons.push("Password should contain at least one lowercase letter.");
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(reasons.join(", ").into());
        Err(error)
    }
}
