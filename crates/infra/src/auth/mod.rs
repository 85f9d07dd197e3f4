//! Authentication adapters: password hashing and signed access tokens

pub mod jwt;
pub mod password;

pub use jwt::JwtTokenIssuer;
pub use password::Argon2PasswordHasher;
