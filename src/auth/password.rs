/// Password Hashing and Verification
///
/// bcrypt-backed hashing and comparison. A mismatch is an authentication
/// failure; a bcrypt error (e.g. a corrupt stored hash) is internal.

use crate::error::{AppError, AuthError};

/// Hashes plaintext secrets and checks plaintext against a stored hash
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// # Errors
    /// `AuthError::InvalidCredentials` when the password does not match
    fn compare(&self, password: &str, hash: &str) -> Result<(), AppError>;
}

/// `PasswordHasher` using the `bcrypt` crate
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn compare(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let matches = bcrypt::verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if matches {
            Ok(())
        } else {
            Err(AppError::Auth(AuthError::InvalidCredentials))
        }
    }
}
