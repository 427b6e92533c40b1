use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{error, info};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within an access token.
///
/// Tokens are stateless: there is no server-side session table, so a token
/// remains usable until natural expiry. There is no nonce; identical
/// inputs at identical timestamps produce identical tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the username (email) of the identity.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// A freshly issued access token, as returned to the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Issues a signed access token for the given subject.
///
/// The claims carry the subject and an expiry of now plus the configured
/// TTL; key and algorithm come from the immutable process configuration.
pub fn issue_token(subject: &str, config: &Config) -> Result<TokenResponse, AppError> {
    let expire = chrono::Utc::now() + chrono::Duration::minutes(config.access_token_expire_minutes);
    let claims = Claims {
        sub: subject.to_owned(),
        exp: expire.timestamp() as usize,
    };

    let access_token = encode(
        &Header::new(config.algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

    info!("JWT access token was created for user: {}", subject);
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

/// Verifies a token's signature and expiry atomically and decodes its claims.
///
/// Expiry is checked with zero leeway: a token is valid only while `exp` is
/// in the future. Bad signature, malformed structure and expired token all
/// collapse into the same `Unauthorized` credentials error; the cause is
/// logged here and never surfaced to the caller.
pub fn decode_token(token: &str, config: &Config) -> Result<Claims, AppError> {
    let mut validation = Validation::new(config.algorithm);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        error!("Credential error while verifying access token: {}", e);
        AppError::Unauthorized("Could not validate credentials".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config(secret: &str, ttl_minutes: i64) -> Config {
        Config {
            database_url: String::new(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            secret_key: secret.to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: ttl_minutes,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config("test_secret_for_round_trip", 30);
        let token = issue_token("user@example.com", &config).unwrap();

        assert_eq!(token.token_type, "bearer");

        let claims = decode_token(&token.access_token, &config).unwrap();
        assert_eq!(claims.sub, "user@example.com");

        // exp is approximately now + TTL.
        let expected = (chrono::Utc::now() + chrono::Duration::minutes(30)).timestamp() as usize;
        assert!(claims.exp.abs_diff(expected) <= 5);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config("test_secret_for_expiration", -1);
        let token = issue_token("user@example.com", &config).unwrap();

        match decode_token(&token.access_token, &config) {
            Err(AppError::Unauthorized(msg)) => {
                assert_eq!(msg, "Could not validate credentials");
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = test_config("test_secret_for_tamper", 30);
        let token = issue_token("user@example.com", &config).unwrap().access_token;

        // Flip the first character of the signature segment.
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut tampered = token.clone();
        let original = tampered.remove(sig_start);
        tampered.insert(sig_start, if original == 'A' { 'B' } else { 'A' });
        assert_ne!(token, tampered);

        assert!(matches!(
            decode_token(&tampered, &config),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config("test_secret_one", 30);
        let other = test_config("test_secret_two", 30);

        let token = issue_token("user@example.com", &config).unwrap();
        assert!(matches!(
            decode_token(&token.access_token, &other),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = test_config("test_secret_garbage", 30);
        assert!(matches!(
            decode_token("garbage", &config),
            Err(AppError::Unauthorized(_))
        ));
    }
}
