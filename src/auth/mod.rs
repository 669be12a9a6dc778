/// Authentication module
///
/// Token signing, password comparison, refresh token revocation and the
/// login / refresh / logout flows built on top of them.

mod claims;
mod jwt;
mod password;
mod payload;
mod refresh_token;
mod service;

pub use claims::{Claims, Identity};
pub use jwt::{JwtTokenSigner, TokenSigner};
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use payload::{LoginPayload, RefreshTokenPayload};
pub use refresh_token::{InMemoryRevocationStore, PostgresRevocationStore, RevocationStore};
pub use service::{AuthenticationResult, AuthenticationService};
