use log::{error, info};
use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::Identity;
use crate::store::CredentialStore;

/// Orchestrates registration and login against the credential store and the
/// password hasher. Token issuance stays at the API boundary; this service
/// only ever deals in identities.
pub struct IdentityService {
    store: Arc<dyn CredentialStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Registers a new identity.
    ///
    /// The uniqueness check runs before the password-match check, so an
    /// attempt against an existing username reports the conflict even when
    /// the passwords also differ. Password strength is validated upstream
    /// at the request boundary; the match check is enforced here
    /// regardless.
    pub async fn register(
        &self,
        username: &str,
        password1: &str,
        password2: &str,
    ) -> Result<Identity, AppError> {
        if self.store.get_by_username(username).await?.is_some() {
            error!("User: {} tried to register an existing username", username);
            return Err(AppError::Conflict("username already in use".into()));
        }
        if password1 != password2 {
            error!("User: {} entered mismatched passwords", username);
            return Err(AppError::Validation("Passwords do not match".into()));
        }

        let password_hash = hash_password(password1)?;
        let identity = self.store.create(username, &password_hash).await?;
        info!("User: {} was registered", username);
        Ok(identity)
    }

    /// Verifies the provided credentials and returns the matching identity.
    /// The caller is responsible for converting it into a signed token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let identity = match self.store.get_by_username(username).await? {
            Some(identity) => identity,
            None => {
                error!(
                    "Login attempt with a non-existent user, username: {}",
                    username
                );
                return Err(AppError::NotFound(
                    "Invalid credentials, user with the provided username does not exist".into(),
                ));
            }
        };

        if !verify_password(password, &identity.password_hash) {
            error!("Login attempt with wrong password, username: {}", username);
            return Err(AppError::Unauthorized(
                "Invalid credentials, invalid password".into(),
            ));
        }

        info!("User: {} has logged in", username);
        Ok(identity)
    }

    /// Fetch-or-fail lookup used by the token-resolution path.
    ///
    /// A missing user surfaces as the same credentials error a bad token
    /// produces, so the authentication path never reveals whether an
    /// account exists.
    pub async fn resolve(&self, username: &str) -> Result<Identity, AppError> {
        match self.store.get_by_username(username).await? {
            Some(identity) => Ok(identity),
            None => {
                error!(
                    "Credential error while resolving user: {}, user does not exist",
                    username
                );
                Err(AppError::Unauthorized("Could not validate credentials".into()))
            }
        }
    }
}
