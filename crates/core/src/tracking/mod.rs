//! Time tracking: reports, their ownership and the edit window

pub mod edit_window;
pub mod ports;
pub mod service;

pub use edit_window::ensure_editable;
pub use service::TimeTrackingService;
