//! # Timebook server
//!
//! HTTP surface of Timebook.
//!
//! This crate contains:
//! - Route handlers (`commands`), one module per resource
//! - Application context (dependency injection)
//! - Error rendering, extractors and request tracing
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the repositories and services together in [`AppContext`]
//! - Serves JSON over axum; every failure renders as `{"error": ...}`

pub mod commands;
pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod query;
pub mod router;
pub mod utils;

pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
