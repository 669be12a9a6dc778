/// Token payload types
///
/// `Identity` is the minimal set of claims embedded in both token kinds.
/// `Claims` is the full JWT body wrapped around it.

use serde::{Deserialize, Serialize};

/// Identity embedded in access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    /// Stable user identifier from the credential store
    pub id: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id: id.into(),
        }
    }
}

/// JWT Claims shared by both token kinds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub username: String,
    pub id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp). Access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Unique token id. Refresh tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Claims for a short-lived access token
    pub fn access(identity: &Identity, expiry_seconds: i64, issuer: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            username: identity.username.clone(),
            id: identity.id.clone(),
            iat: now,
            iss: issuer.to_string(),
            exp: Some(now + expiry_seconds),
            jti: None,
        }
    }

    /// Claims for a refresh token. No expiry; revocation is by store removal.
    pub fn refresh(identity: &Identity, issuer: &str) -> Self {
        Self {
            username: identity.username.clone(),
            id: identity.id.clone(),
            iat: chrono::Utc::now().timestamp(),
            iss: issuer.to_string(),
            exp: None,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone(), self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_expire() {
        let identity = Identity::new("dicoding", "user-123");
        let claims = Claims::access(&identity, 3600, "test");

        assert_eq!(claims.identity(), identity);
        assert_eq!(claims.exp, Some(claims.iat + 3600));
        assert!(claims.jti.is_none());
    }

    #[test]
    fn test_refresh_claims_are_unique() {
        let identity = Identity::new("dicoding", "user-123");
        let first = Claims::refresh(&identity, "test");
        let second = Claims::refresh(&identity, "test");

        assert!(first.exp.is_none());
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_optional_claims_omitted_from_json() {
        let identity = Identity::new("dicoding", "user-123");
        let json = serde_json::to_value(Claims::refresh(&identity, "test")).unwrap();

        assert!(json.get("exp").is_none());
        assert_eq!(json["username"], "dicoding");
        assert_eq!(json["id"], "user-123");
    }
}
