/// Refresh Token Revocation Store
///
/// A whitelist of currently valid refresh tokens. The token string is both
/// key and value; presence means active, absence means never issued or
/// revoked. There is no expiry and no per-user linkage.

use async_trait::async_trait;
use dashmap::DashSet;
use sqlx::PgPool;

use crate::error::{AppError, AuthError};

/// Durable set of active refresh tokens
///
/// Each call must be atomic with respect to concurrent callers.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Insert a token. Inserting an existing token is a no-op.
    async fn add_token(&self, token: &str) -> Result<(), AppError>;

    /// # Errors
    /// `AuthError::RefreshTokenNotFound` if the token is absent
    async fn validate_token(&self, token: &str) -> Result<(), AppError>;

    /// Remove a token. Removing an absent token is a no-op that returns
    /// `false`; `true` means this call removed it.
    async fn delete_token(&self, token: &str) -> Result<bool, AppError>;
}

/// Postgres-backed store over the `authentications` table
#[derive(Clone)]
pub struct PostgresRevocationStore {
    pool: PgPool,
}

impl PostgresRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn add_token(&self, token: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO authentications (token)
            VALUES ($1)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn validate_token(&self, token: &str) -> Result<(), AppError> {
        let result = sqlx::query_scalar::<_, String>(
            "SELECT token FROM authentications WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(_) => Ok(()),
            None => {
                tracing::warn!("Refresh token not found in database");
                Err(AppError::Auth(AuthError::RefreshTokenNotFound))
            }
        }
    }

    async fn delete_token(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM authentications WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Process-local store for tests and single-instance deployments
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    tokens: DashSet<String>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn add_token(&self, token: &str) -> Result<(), AppError> {
        self.tokens.insert(token.to_string());
        Ok(())
    }

    async fn validate_token(&self, token: &str) -> Result<(), AppError> {
        if self.tokens.contains(token) {
            Ok(())
        } else {
            tracing::warn!("Refresh token not found in store");
            Err(AppError::Auth(AuthError::RefreshTokenNotFound))
        }
    }

    async fn delete_token(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.tokens.remove(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_then_validate() {
        let store = InMemoryRevocationStore::new();

        store.add_token("token").await.unwrap();

        assert!(store.validate_token("token").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let store = InMemoryRevocationStore::new();

        let result = store.validate_token("aNotValidToken").await;
        assert!(matches!(result, Err(AppError::Auth(AuthError::RefreshTokenNotFound))));
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = InMemoryRevocationStore::new();

        store.add_token("token").await.unwrap();
        store.add_token("token").await.unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_token() {
        let store = InMemoryRevocationStore::new();

        store.add_token("token").await.unwrap();
        assert!(store.delete_token("token").await.unwrap());

        assert!(store.is_empty());
        assert!(store.validate_token("token").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_token_succeeds() {
        let store = InMemoryRevocationStore::new();

        assert!(!store.delete_token("never-added").await.unwrap());
    }
}
