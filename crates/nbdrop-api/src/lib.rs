//! nbdrop API library
//!
//! HTTP handlers, application state and startup for the upload service.

mod handlers;
mod services;
mod utils;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
