//! Server utilities

pub mod command_helpers;
pub mod health;
pub mod logging;
