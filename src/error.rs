/// Error Handling Module
///
/// One error type for the whole service. Every failure in the login, refresh
/// and logout flows is one of these kinds and is propagated unchanged to the
/// HTTP boundary, where it is mapped to a status code and a JSON body.
///
/// 1. Domain-specific error types
/// 2. Unified application error type
/// 3. HTTP response mapping

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Request payload shape errors, detected before any external call
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is absent, null, false, zero or empty
    MissingField(String),
    /// A required field is present but is not a string
    InvalidType(String),
    /// Body is not a JSON object or has the wrong content type
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "{} is required", field),
            ValidationError::InvalidType(field) => write!(f, "{} must be a string", field),
            ValidationError::MalformedBody(msg) => write!(f, "request body is invalid: {}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Storage failures. Always fatal to the current operation.
#[derive(Debug)]
pub enum DatabaseError {
    QueryExecution(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Authentication errors
///
/// `TokenInvalid` covers malformed structure, bad signature, wrong key and
/// expiry alike.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Username is not known to the credential store
    IdentityNotFound,
    /// Password does not match the stored hash
    InvalidCredentials,
    /// Refresh token failed structural or signature verification
    TokenInvalid,
    /// Refresh token is not present in the revocation store
    RefreshTokenNotFound,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::IdentityNotFound => write!(f, "Username not found"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::TokenInvalid => write!(f, "Invalid refresh token"),
            AuthError::RefreshTokenNotFound => write!(f, "Refresh token not found"),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

/// Every sqlx failure is a storage failure. Lookups that may legitimately
/// return nothing use `fetch_optional` and map `None` themselves.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let error_msg = err.to_string();

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                AppError::Database(DatabaseError::ConnectionPool(error_msg))
            }
            sqlx::Error::Database(_) | sqlx::Error::RowNotFound | sqlx::Error::ColumnDecode { .. } => {
                AppError::Database(DatabaseError::QueryExecution(error_msg))
            }
            _ => AppError::Database(DatabaseError::UnexpectedError(error_msg)),
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::IdentityNotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::TokenInvalid | AuthError::RefreshTokenNotFound => {
                    StatusCode::BAD_REQUEST
                }
            },
            AppError::Database(DatabaseError::ConnectionPool(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Auth(AuthError::IdentityNotFound) => "IDENTITY_NOT_FOUND",
            AppError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            AppError::Auth(AuthError::TokenInvalid) => "TOKEN_INVALID",
            AppError::Auth(AuthError::RefreshTokenNotFound) => "REFRESH_TOKEN_NOT_FOUND",
            AppError::Database(DatabaseError::ConnectionPool(_)) => "SERVICE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let status = self.status();

        // Server-side details never leave the process
        let message = match self {
            AppError::Validation(_) | AppError::Auth(_) => self.to_string(),
            AppError::Database(DatabaseError::ConnectionPool(_)) => {
                "Database service temporarily unavailable".to_string()
            }
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Server configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        };

        let error_response = ErrorResponse::new(
            request_id.to_string(),
            message,
            self.code().to_string(),
            status.as_u16(),
        );

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %e,
                    "Validation error"
                );
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Invalid credentials attempt"
                );
            }
            AppError::Auth(e) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %e,
                    "Authentication error"
                );
            }
            AppError::Database(e) => {
                tracing::error!(
                    request_id = request_id,
                    error = %e,
                    "Database error"
                );
            }
            AppError::Config(e) => {
                tracing::error!(
                    request_id = request_id,
                    error = %e,
                    "Configuration error"
                );
            }
            AppError::Internal(msg) => {
                tracing::error!(
                    request_id = request_id,
                    error = %msg,
                    "Internal error"
                );
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = crate::logger::current_request_id();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        self.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingField("refreshToken".to_string());
        assert_eq!(err.to_string(), "refreshToken is required");

        let err = ValidationError::InvalidType("username".to_string());
        assert_eq!(err.to_string(), "username must be a string");
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = AuthError::RefreshTokenNotFound.into();
        match app_err {
            AppError::Auth(AuthError::RefreshTokenNotFound) => (),
            _ => panic!("Expected RefreshTokenNotFound"),
        }
    }

    #[test]
    fn test_status_codes_per_kind() {
        let cases: Vec<(AppError, u16)> = vec![
            (ValidationError::MissingField("refreshToken".into()).into(), 400),
            (AuthError::IdentityNotFound.into(), 404),
            (AuthError::InvalidCredentials.into(), 401),
            (AuthError::TokenInvalid.into(), 400),
            (AuthError::RefreshTokenNotFound.into(), 400),
            (DatabaseError::ConnectionPool("down".into()).into(), 503),
            (DatabaseError::QueryExecution("bad".into()).into(), 500),
            (AppError::Internal("boom".into()), 500),
        ];

        for (err, expected) in cases {
            assert_eq!(ResponseError::status_code(&err).as_u16(), expected, "{}", err);
        }
    }

    #[test]
    fn test_sqlx_errors_stay_storage_failures() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Database(DatabaseError::ConnectionPool(_))));

        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_error_id_matches_request_id() {
        let request_id = uuid::Uuid::new_v4();

        let response = crate::logger::REQUEST_ID
            .scope(request_id, async {
                ResponseError::error_response(&AppError::Auth(AuthError::RefreshTokenNotFound))
            })
            .await;

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_id"], request_id.to_string());
        assert_eq!(body["code"], "REFRESH_TOKEN_NOT_FOUND");
    }

    #[test]
    fn test_error_response_hides_database_details() {
        let err: AppError = DatabaseError::QueryExecution("relation missing".into()).into();
        let (status, response) = <AppError as ErrorHandler>::error_response(&err, "req-1");

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_id, "req-1");
        assert_eq!(response.code, "DATABASE_ERROR");
        assert!(!response.message.contains("relation"));
    }
}
