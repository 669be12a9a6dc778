use std::net::TcpListener;
use std::sync::Arc;

use async_trait::async_trait;
use session_auth::auth::{
    AuthenticationService, BcryptPasswordHasher, InMemoryRevocationStore, JwtTokenSigner,
};
use session_auth::configuration::JwtSettings;
use session_auth::error::{AppError, AuthError};
use session_auth::startup::run;
use session_auth::users::UserRepository;

struct NoUsers;

#[async_trait]
impl UserRepository for NoUsers {
    async fn get_password_by_username(&self, _username: &str) -> Result<String, AppError> {
        Err(AppError::Auth(AuthError::IdentityNotFound))
    }

    async fn get_id_by_username(&self, _username: &str) -> Result<String, AppError> {
        Err(AppError::Auth(AuthError::IdentityNotFound))
    }
}

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let jwt = JwtSettings {
        access_token_key: "health-access-key".to_string(),
        refresh_token_key: "health-refresh-key".to_string(),
        access_token_age: 3000,
        issuer: "test".to_string(),
    };
    let service = AuthenticationService::new(
        Arc::new(NoUsers),
        Arc::new(BcryptPasswordHasher::new(4)),
        Arc::new(JwtTokenSigner::new(&jwt)),
        Arc::new(InMemoryRevocationStore::new()),
    );

    let server = run(listener, service).expect("Failed to create server");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/health_check", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/nope", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(404, response.status().as_u16());
}
