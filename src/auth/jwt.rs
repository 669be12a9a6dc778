/// JWT Token Signing and Verification
///
/// Access and refresh tokens share one encoding (HS256 JWT) but are signed
/// with two independent keys. A token is only ever checked against the key
/// of its own kind; there is no fallback between keys.

use std::collections::HashSet;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, Identity};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Creates and verifies signed identity tokens
pub trait TokenSigner: Send + Sync {
    /// Sign an access token with the access key
    fn create_access_token(&self, identity: &Identity) -> Result<String, AppError>;

    /// Sign a refresh token with the refresh key
    fn create_refresh_token(&self, identity: &Identity) -> Result<String, AppError>;

    /// Check structure and signature against the refresh key only
    ///
    /// # Errors
    /// `AuthError::TokenInvalid` for every failure cause
    fn verify_refresh_token(&self, token: &str) -> Result<(), AppError>;

    /// Extract the identity from a well-formed token without checking its
    /// signature. Callers verify first when trust matters.
    fn decode_payload(&self, token: &str) -> Result<Identity, AppError>;
}

/// `TokenSigner` backed by `jsonwebtoken`
pub struct JwtTokenSigner {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_token_age: i64,
    issuer: String,
}

impl JwtTokenSigner {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_key.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_key.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_key.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_key.as_bytes()),
            access_token_age: config.access_token_age,
            issuer: config.issuer.clone(),
        }
    }

    /// Validate an access token against the access key and return its claims
    ///
    /// Access tokens are stateless; nothing beyond signature, issuer and
    /// expiry is consulted.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.access_decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("Access token validation error: {}", e);
                AppError::Auth(AuthError::TokenInvalid)
            })
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

impl TokenSigner for JwtTokenSigner {
    fn create_access_token(&self, identity: &Identity) -> Result<String, AppError> {
        let claims = Claims::access(identity, self.access_token_age, &self.issuer);
        self.sign(&claims, &self.access_encoding)
    }

    fn create_refresh_token(&self, identity: &Identity) -> Result<String, AppError> {
        let claims = Claims::refresh(identity, &self.issuer);
        self.sign(&claims, &self.refresh_encoding)
    }

    fn verify_refresh_token(&self, token: &str) -> Result<(), AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        // Refresh tokens carry no `exp`; one that does is still checked.
        validation.required_spec_claims = HashSet::new();

        decode::<Claims>(token, &self.refresh_decoding, &validation)
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!("Refresh token validation error: {}", e);
                AppError::Auth(AuthError::TokenInvalid)
            })
    }

    fn decode_payload(&self, token: &str) -> Result<Identity, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.identity())
            .map_err(|e| {
                tracing::warn!("Token payload decoding error: {}", e);
                AppError::Auth(AuthError::TokenInvalid)
            })
    }
}
