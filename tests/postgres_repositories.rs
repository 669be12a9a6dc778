//! Postgres-backed store tests. Need a running Postgres reachable with the
//! settings from `configuration.yaml`; run with `cargo test -- --ignored`.

use session_auth::auth::{PostgresRevocationStore, RevocationStore};
use session_auth::configuration::{get_configuration, DatabaseSettings};
use session_auth::error::{AppError, AuthError};
use session_auth::users::{PostgresUserRepository, UserRepository};
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

async fn test_pool() -> PgPool {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    configure_database(&configuration.database).await
}

async fn count_tokens(pool: &PgPool, token: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM authentications WHERE token = $1")
        .bind(token)
        .fetch_one(pool)
        .await
        .expect("Failed to count tokens")
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn add_token_inserts_once() {
    let pool = test_pool().await;
    let store = PostgresRevocationStore::new(pool.clone());

    store.add_token("token").await.unwrap();
    store.add_token("token").await.unwrap();

    assert_eq!(count_tokens(&pool, "token").await, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn validate_token_reports_missing_token() {
    let pool = test_pool().await;
    let store = PostgresRevocationStore::new(pool);

    let result = store.validate_token("aNotValidToken").await;
    assert!(matches!(result, Err(AppError::Auth(AuthError::RefreshTokenNotFound))));

    store.add_token("token").await.unwrap();
    assert!(store.validate_token("token").await.is_ok());
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn delete_token_removes_row() {
    let pool = test_pool().await;
    let store = PostgresRevocationStore::new(pool.clone());

    store.add_token("token").await.unwrap();
    assert!(store.delete_token("token").await.unwrap());
    assert!(!store.delete_token("token").await.unwrap());

    assert_eq!(count_tokens(&pool, "token").await, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn user_lookups() {
    let pool = test_pool().await;
    sqlx::query("INSERT INTO users (id, username, password, fullname) VALUES ($1, $2, $3, $4)")
        .bind("user-123")
        .bind("dicoding")
        .bind("secret_hash")
        .bind("Dicoding Indonesia")
        .execute(&pool)
        .await
        .expect("Failed to insert user");
    let users = PostgresUserRepository::new(pool);

    assert_eq!(users.get_password_by_username("dicoding").await.unwrap(), "secret_hash");
    assert_eq!(users.get_id_by_username("dicoding").await.unwrap(), "user-123");
    assert!(matches!(
        users.get_id_by_username("nobody").await,
        Err(AppError::Auth(AuthError::IdentityNotFound))
    ));
}
