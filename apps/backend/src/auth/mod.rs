pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::IdentityClaims;
pub use jwt::{mint_access_token, verify_access_token, Claims, TokenError, ACCESS_TOKEN_TTL_SECS};
pub use password::PasswordHasher;
