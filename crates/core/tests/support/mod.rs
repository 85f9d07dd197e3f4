//! Shared test helpers for `timebook-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fixtures;
pub mod repositories;
