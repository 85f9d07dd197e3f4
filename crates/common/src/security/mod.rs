//! Security primitives shared by the service crates.

pub mod password;

pub use password::{PasswordError, PasswordHasher};
