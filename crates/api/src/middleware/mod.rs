//! HTTP middleware

pub mod request_tracing;

pub use request_tracing::request_tracing_middleware;
