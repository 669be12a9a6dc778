/// Authentication Routes
///
/// Thin HTTP layer over `AuthenticationService`: login, refresh and logout
/// on the `/authentications` resource.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::{AuthenticationResult, AuthenticationService, LoginPayload, RefreshTokenPayload};
use crate::error::AppError;

#[derive(Serialize)]
struct SuccessResponse<T: Serialize> {
    status: &'static str,
    data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenData {
    access_token: String,
}

#[derive(Serialize)]
struct MessageResponse {
    status: &'static str,
    message: &'static str,
}

/// POST /authentications
///
/// Log in with username and password.
///
/// # Errors
/// - 400: Missing or non-string username/password
/// - 404: Username not found
/// - 401: Wrong password
/// - 500/503: Storage failure
pub async fn post_authentication(
    payload: web::Json<LoginPayload>,
    service: web::Data<AuthenticationService>,
) -> Result<HttpResponse, AppError> {
    let (username, password) = payload.credentials()?;

    let tokens: AuthenticationResult = service.login(username, password).await?;

    Ok(HttpResponse::Created().json(SuccessResponse::new(tokens)))
}

/// PUT /authentications
///
/// Exchange a refresh token for a new access token.
///
/// # Errors
/// - 400: Missing/non-string token, invalid signature, or token not found
/// - 500/503: Storage failure
pub async fn put_authentication(
    payload: web::Json<RefreshTokenPayload>,
    service: web::Data<AuthenticationService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = payload.refresh_token()?;

    let access_token = service.refresh(refresh_token).await?;

    Ok(HttpResponse::Ok().json(SuccessResponse::new(AccessTokenData { access_token })))
}

/// DELETE /authentications
///
/// Revoke a refresh token.
///
/// # Errors
/// - 400: Missing/non-string token, or token not found
/// - 500/503: Storage failure
pub async fn delete_authentication(
    payload: web::Json<RefreshTokenPayload>,
    service: web::Data<AuthenticationService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = payload.refresh_token()?;

    service.logout(refresh_token).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        status: "success",
        message: "Refresh token deleted",
    }))
}
