/// Credential store lookups
///
/// Resolves a username to its stored password hash and to its stable user
/// id. User registration and profile management live elsewhere.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, AuthError};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    /// `AuthError::IdentityNotFound` if the username is unknown
    async fn get_password_by_username(&self, username: &str) -> Result<String, AppError>;

    /// # Errors
    /// `AuthError::IdentityNotFound` if the username is unknown
    async fn get_id_by_username(&self, username: &str) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_password_by_username(&self, username: &str) -> Result<String, AppError> {
        sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Username not found");
                AppError::Auth(AuthError::IdentityNotFound)
            })
    }

    async fn get_id_by_username(&self, username: &str) -> Result<String, AppError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Username not found");
                AppError::Auth(AuthError::IdentityNotFound)
            })
    }
}
