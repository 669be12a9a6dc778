/// Request payload shape checks
///
/// Fields are kept as raw JSON so that "absent" and "wrong type" can be told
/// apart and reported before any lookup or crypto work.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, ValidationError};

/// Login request body
#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

impl LoginPayload {
    /// Returns `(username, password)` once both are present, non-empty strings
    pub fn credentials(&self) -> Result<(&str, &str), AppError> {
        if is_missing(&self.username) || is_missing(&self.password) {
            let field = if is_missing(&self.username) { "username" } else { "password" };
            return Err(ValidationError::MissingField(field.to_string()).into());
        }

        let username = as_string(&self.username, "username")?;
        let password = as_string(&self.password, "password")?;
        Ok((username, password))
    }
}

/// Refresh and logout request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenPayload {
    #[serde(default)]
    pub refresh_token: Option<Value>,
}

impl RefreshTokenPayload {
    pub fn refresh_token(&self) -> Result<&str, AppError> {
        if is_missing(&self.refresh_token) {
            return Err(ValidationError::MissingField("refreshToken".to_string()).into());
        }
        as_string(&self.refresh_token, "refreshToken")
    }
}

/// Falsy JSON values count as absent: null, false, 0 and ""
fn is_missing(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

fn as_string<'a>(value: &'a Option<Value>, field: &str) -> Result<&'a str, AppError> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::InvalidType(field.to_string()).into())
}
