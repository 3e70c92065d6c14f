//! Middleware shared by every service router.

pub mod logging;

pub use logging::request_logging;
