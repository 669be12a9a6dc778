use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{
    AuthenticationService, BcryptPasswordHasher, JwtTokenSigner, PostgresRevocationStore,
};
use crate::configuration::Settings;
use crate::error::{AppError, ValidationError};
use crate::logger::LoggerMiddleware;
use crate::routes::{delete_authentication, health_check, post_authentication, put_authentication};
use crate::users::PostgresUserRepository;

/// Wire the Postgres-backed collaborators into an `AuthenticationService`
pub fn build_authentication_service(
    pool: PgPool,
    settings: &Settings,
) -> Result<AuthenticationService, AppError> {
    settings.jwt.validate()?;

    Ok(AuthenticationService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(BcryptPasswordHasher::new(settings.password.bcrypt_cost)),
        Arc::new(JwtTokenSigner::new(&settings.jwt)),
        Arc::new(PostgresRevocationStore::new(pool)),
    ))
}

pub fn run(
    listener: TcpListener,
    service: AuthenticationService,
) -> Result<Server, std::io::Error> {
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
            }))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/authentications")
                    .route(web::post().to(post_authentication))
                    .route(web::put().to(put_authentication))
                    .route(web::delete().to(delete_authentication)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
