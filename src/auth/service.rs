/// Authentication Orchestrator
///
/// Composes the credential store, password hasher, token signer and
/// revocation store into the login, refresh and logout flows. Every failure
/// short-circuits the flow and propagates unchanged; nothing is retried.
///
/// A refresh token moves `Unissued -> Active` at login and
/// `Active -> Revoked` at logout. Refresh never rotates it.

use std::sync::Arc;

use serde::Serialize;

use crate::auth::claims::Identity;
use crate::auth::jwt::TokenSigner;
use crate::auth::password::PasswordHasher;
use crate::auth::refresh_token::RevocationStore;
use crate::error::{AppError, AuthError, ValidationError};
use crate::users::UserRepository;

/// Token pair returned once at login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthenticationService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenSigner>,
    authentications: Arc<dyn RevocationStore>,
}

impl AuthenticationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenSigner>,
        authentications: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            authentications,
        }
    }

    /// Authenticate a user and issue a new access/refresh token pair
    ///
    /// The refresh token is persisted before returning; if that fails no
    /// tokens are handed out.
    ///
    /// # Errors
    /// - `ValidationError::MissingField`: empty username or password
    /// - `AuthError::IdentityNotFound`: unknown username
    /// - `AuthError::InvalidCredentials`: password mismatch
    /// - `AppError::Database`: store unavailable
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AppError> {
        require_non_empty(username, "username")?;
        require_non_empty(password, "password")?;

        let hashed_password = self.users.get_password_by_username(username).await?;
        self.passwords.compare(password, &hashed_password)?;
        let id = self.users.get_id_by_username(username).await?;

        let identity = Identity::new(username, id);
        let access_token = self.tokens.create_access_token(&identity)?;
        let refresh_token = self.tokens.create_refresh_token(&identity)?;

        self.authentications.add_token(&refresh_token).await?;

        tracing::info!(
            username = %identity.username,
            user_id = %identity.id,
            "User logged in successfully"
        );

        Ok(AuthenticationResult {
            access_token,
            refresh_token,
        })
    }

    /// Exchange an active refresh token for a new access token
    ///
    /// Signature is checked before store membership.
    ///
    /// # Errors
    /// - `ValidationError::MissingField`: empty token
    /// - `AuthError::TokenInvalid`: bad structure, signature or key
    /// - `AuthError::RefreshTokenNotFound`: never issued or already revoked
    /// - `AppError::Database`: store unavailable
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        require_non_empty(refresh_token, "refreshToken")?;

        self.tokens.verify_refresh_token(refresh_token)?;
        self.authentications.validate_token(refresh_token).await?;

        let identity = self.tokens.decode_payload(refresh_token)?;
        let access_token = self.tokens.create_access_token(&identity)?;

        tracing::info!(user_id = %identity.id, "Access token refreshed");

        Ok(access_token)
    }

    /// Revoke a refresh token
    ///
    /// Unlike the store's own delete, an unknown token is an error here.
    ///
    /// # Errors
    /// - `ValidationError::MissingField`: empty token
    /// - `AuthError::RefreshTokenNotFound`: never issued or already revoked
    /// - `AppError::Database`: store unavailable
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        require_non_empty(refresh_token, "refreshToken")?;

        self.authentications.validate_token(refresh_token).await?;

        // A concurrent logout may have removed it since the check
        if !self.authentications.delete_token(refresh_token).await? {
            tracing::warn!("Refresh token already revoked");
            return Err(AuthError::RefreshTokenNotFound.into());
        }

        tracing::info!("Refresh token revoked");
        Ok(())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}
