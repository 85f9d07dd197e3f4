//! Authentication: login and per-request token checks

pub mod ports;
pub mod service;

pub use service::{AuthService, LoginResponse};
