//! Domain utilities

pub mod calendar;
