//! Common utilities for the demo binaries.
//!
//! This module provides shared functionality used across
//! the command-line tools.

pub mod backend;
pub mod logging;
pub mod preview;

// Re-export commonly used items
pub use backend::{create_device, get_backend_name, SelectedBackend, SelectedDevice};
pub use logging::init_tracing;
pub use preview::{raw_to_rgba8, save_preview, TensorStats};
