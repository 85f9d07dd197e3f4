//! HTTP handlers, one module per resource

pub mod activities;
pub mod auth;
pub mod clients;
pub mod health;
pub mod reports;
pub mod time_tracking;
pub mod users;
